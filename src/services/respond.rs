//! JSON response writing.
//!
//! Responsibility:
//! - Serialize a payload and write it with a status code through a `ResponseSink`
//! - Error replies as `{"error": "<message>"}`, with the internal cause logged
//!   separately so it never reaches the client
//! - Logging goes through `ReplyLog` so callers (and tests) can swap it out
//!
//! Serialization and write failures are terminal here: they are logged and
//! nothing is returned, since the status line may already be committed.

use std::{error::Error, fmt, io, sync::Arc};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: &'a str,
}

/// Log sink for the side effects of writing a response.
pub trait ReplyLog: Send + Sync {
    fn serialize_failed(&self, err: &serde_json::Error);
    fn write_failed(&self, err: &io::Error);
    fn cause(&self, cause: &(dyn Error + 'static));
    fn server_error(&self, message: &str);
}

/// `ReplyLog` backed by `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl ReplyLog for TracingLog {
    fn serialize_failed(&self, err: &serde_json::Error) {
        tracing::error!(error = %err, "error marshalling JSON response");
    }

    fn write_failed(&self, err: &io::Error) {
        tracing::warn!(error = %err, "error writing response");
    }

    fn cause(&self, cause: &(dyn Error + 'static)) {
        tracing::error!(error = %error_chain(cause), "request failed");
    }

    fn server_error(&self, message: &str) {
        tracing::error!(reply = message, "responding with 5XX error");
    }
}

fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}

/// Outgoing half of an HTTP exchange.
pub trait ResponseSink {
    fn headers_mut(&mut self) -> &mut HeaderMap;
    /// Commits the status line. Later calls are ignored.
    fn write_status(&mut self, status: StatusCode);
    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// In-memory sink that becomes an axum `Response`.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseSink for BufferedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let mut res = Response::new(Body::from(self.body));
        *res.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *res.headers_mut() = self.headers;
        res
    }
}

#[derive(Clone)]
pub struct Responder {
    log: Arc<dyn ReplyLog>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(Arc::new(TracingLog))
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}

impl Responder {
    pub fn new(log: Arc<dyn ReplyLog>) -> Self {
        Self { log }
    }

    pub fn write_json<S, T>(&self, sink: &mut S, status: StatusCode, payload: &T)
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        sink.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let bytes = match serde_json::to_vec(payload) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.log.serialize_failed(&err);
                sink.write_status(StatusCode::INTERNAL_SERVER_ERROR);
                return;
            }
        };

        sink.write_status(status);
        if let Err(err) = sink.write_body(&bytes) {
            self.log.write_failed(&err);
        }
    }

    pub fn write_error<S>(
        &self,
        sink: &mut S,
        status: StatusCode,
        message: &str,
        cause: Option<&(dyn Error + 'static)>,
    ) where
        S: ResponseSink + ?Sized,
    {
        if let Some(cause) = cause {
            self.log.cause(cause);
        }
        // StatusCode admits 600..=999 as well
        if status.as_u16() >= 500 {
            self.log.server_error(message);
        }
        self.write_json(sink, status, &ErrorResponse { error: message });
    }

    pub fn json<T>(&self, status: StatusCode, payload: &T) -> Response
    where
        T: Serialize + ?Sized,
    {
        let mut res = BufferedResponse::new();
        self.write_json(&mut res, status, payload);
        res.into_response()
    }

    pub fn error(
        &self,
        status: StatusCode,
        message: &str,
        cause: Option<&(dyn Error + 'static)>,
    ) -> Response {
        let mut res = BufferedResponse::new();
        self.write_error(&mut res, status, message, cause);
        res.into_response()
    }
}
