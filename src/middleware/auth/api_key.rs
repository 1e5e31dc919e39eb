//! `Authorization: ApiKey <key>` → ApiKey in request extensions
//!
//! - Only extraction happens here. Whether the key is known is up to handlers
//!   (or a later layer); an empty key is passed through as-is.
//! - Rejections are rendered with the state's Responder.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::ApiKey;
use crate::error::AppError;
use crate::services::auth::api_key::extract_api_key;
use crate::state::AppState;

/// Requires an API key on every route already registered on `router`.
///
/// Uses `route_layer`, so unmatched paths still fall through to the 404 fallback.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, api_key_middleware))
}

async fn api_key_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let key = match extract_api_key(req.headers()) {
        Ok(key) => key,
        Err(err) => {
            tracing::warn!(error = %err, path = %req.uri().path(), "api key extraction failed");
            return AppError::from(err).into_reply(&state.responder);
        }
    };

    req.extensions_mut().insert(ApiKey::new(key));

    next.run(req).await
}
