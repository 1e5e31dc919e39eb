/*
 * Responsibility
 * - Parse the `Authorization: ApiKey <key>` header into scheme + key
 * - The key itself is not checked (store lookup / empty-key policy belong to callers)
 */
use axum::http::{HeaderMap, header};
use thiserror::Error;

/// Scheme expected as the first segment of the `Authorization` value.
pub const API_KEY_SCHEME: &str = "ApiKey";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthHeaderError {
    #[error("no authorization header included")]
    MissingAuthHeader,
    #[error("malformed authorization header")]
    MalformedAuthHeader,
}

/// Extracts the key from `Authorization: ApiKey <key>`.
///
/// The value is split on single spaces; the second segment is returned as-is,
/// so `"ApiKey "` yields an empty key.
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthHeaderError> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AuthHeaderError::MissingAuthHeader),
    };

    // http only hands out visible ASCII as &str
    let value = value
        .to_str()
        .map_err(|_| AuthHeaderError::MalformedAuthHeader)?;

    let mut segments = value.split(' ');
    match (segments.next(), segments.next()) {
        (Some(API_KEY_SCHEME), Some(key)) => Ok(key.to_string()),
        _ => Err(AuthHeaderError::MalformedAuthHeader),
    }
}
