/*
 * Responsibility
 * - GET /me: confirms the caller sent a well-formed API key
 */
use axum::{extract::State, http::StatusCode, response::Response};

use crate::api::v1::{dto::me::MeResponse, extractors::ApiKey};
use crate::state::AppState;

pub async fn me(State(state): State<AppState>, key: ApiKey) -> Response {
    let body = MeResponse {
        authenticated: true,
        key_length: key.as_str().len(),
    };
    state.responder.json(StatusCode::OK, &body)
}
