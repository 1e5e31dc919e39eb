/*
 * Responsibility
 * - Response DTO for GET /me
 * - Never carries the key itself
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    pub key_length: usize,
}
