use axum::{extract::State, response::Response};

use crate::error::AppError;
use crate::state::AppState;

/// JSON 404 for any unmatched path.
pub async fn not_found(State(state): State<AppState>) -> Response {
    AppError::NotFound.into_reply(&state.responder)
}
