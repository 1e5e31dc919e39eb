/*
 * Responsibility
 * - GET /health (liveness, no API key)
 */
use axum::{extract::State, http::StatusCode, response::Response};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Response {
    state.responder.json(StatusCode::OK, &json!({"status": "ok"}))
}
