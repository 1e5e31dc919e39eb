/*
 * Responsibility
 * - App-wide AppError
 * - Rendered as status + `{"error": "..."}` through the AppState's Responder
 * - Internal causes are logged, never sent to the client
 */
use std::error::Error as StdError;

use axum::{http::StatusCode, response::Response};
use thiserror::Error;

use crate::services::auth::api_key::AuthHeaderError;
use crate::services::respond::Responder;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Unauthorized(#[from] AuthHeaderError),
    #[error("not found")]
    NotFound,
    #[error("request timed out")]
    Timeout,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("internal server error")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the error with the given responder (and its log sink).
    pub fn into_reply(self, responder: &Responder) -> Response {
        let status = self.status();
        let message = self.to_string();
        let cause: Option<&(dyn StdError + 'static)> = match &self {
            AppError::Internal(err) => {
                let err: &(dyn StdError + 'static) = err.as_ref();
                Some(err)
            }
            _ => None,
        };
        responder.error(status, &message, cause)
    }
}
