/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to Clone (Arc inside)
 */
use crate::services::respond::Responder;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub responder: Responder,
}

impl AppState {
    pub fn new(responder: Responder) -> Self {
        Self { responder }
    }
}
