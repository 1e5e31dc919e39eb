use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;

use crate::error::AppError;
use crate::services::auth::api_key::AuthHeaderError;
use crate::state::AppState;

use super::ApiKey;

/// Handler-side access to the key the middleware stored in extensions.
/// Missing means the route was not wrapped by the middleware, so it is
/// treated like a request without the header.
impl FromRequestParts<AppState> for ApiKey {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<ApiKey>().cloned().ok_or_else(|| {
            AppError::Unauthorized(AuthHeaderError::MissingAuthHeader)
                .into_reply(&state.responder)
        })
    }
}
