/*
 * Responsibility
 * - URL layout of v1
 * - Decides which routes sit behind the API key middleware
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new().route("/me", get(me));
    let protected = middleware::auth::api_key::apply(protected, state);

    public.merge(protected)
}
