//! Transport-level middleware applied to every route.
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging (TraceLayer)
//! - Body size limit and global timeout, both from `Config`
//!
//! Rejections produced here (timeout, oversized body, other tower errors) are
//! rendered with the same Responder as handler errors, and sit inside the
//! request-id layers so they carry `x-request-id` too.

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::{StatusCode, header, header::HeaderName};
use axum::middleware::map_response_with_state;
use axum::response::Response;
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::services::respond::Responder;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Layers are listed innermost first.
pub fn apply(router: Router, config: &Config, responder: &Responder) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let on_error = responder.clone();

    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    handle_layer_error(&on_error, err)
                }))
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .layer(RequestBodyLimitLayer::new(config.request_body_limit))
        .layer(map_response_with_state(
            responder.clone(),
            json_payload_too_large,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
}

fn handle_layer_error(responder: &Responder, err: BoxError) -> Response {
    let app_err = if err.is::<tower::timeout::error::Elapsed>() {
        AppError::Timeout
    } else {
        AppError::internal(anyhow::Error::msg(err))
    };
    app_err.into_reply(responder)
}

// RequestBodyLimit answers 413 in plain text
async fn json_payload_too_large(State(responder): State<Responder>, res: Response) -> Response {
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v == "application/json");

    if res.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge.into_reply(&responder);
    }
    res
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{body::Body, http::Request, routing::get};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::services::respond::tests::RecordingLog;

    fn recording() -> (Arc<RecordingLog>, Responder) {
        let log = Arc::new(RecordingLog::default());
        let responder = Responder::new(log.clone());
        (log, responder)
    }

    async fn json_body(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn slow_router() -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .route("/fast", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn timeout_renders_json_408_with_request_id() {
        let (log, responder) = recording();
        let config = Config {
            request_timeout: Duration::from_millis(20),
            ..Config::default()
        };
        let app = apply(slow_router(), &config, &responder);

        let res = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(json_body(res).await, json!({"error": "request timed out"}));
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn oversized_body_renders_json_413_with_request_id() {
        let (_, responder) = recording();
        let config = Config {
            request_body_limit: 16,
            ..Config::default()
        };
        let app = apply(slow_router(), &config, &responder);
        let req = Request::builder()
            .uri("/fast")
            .header(header::CONTENT_LENGTH, "64")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();

        let res = app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(
            json_body(res).await,
            json!({"error": "request body too large"})
        );
    }

    #[tokio::test]
    async fn body_within_limit_passes() {
        let (_, responder) = recording();
        let config = Config {
            request_body_limit: 16,
            ..Config::default()
        };
        let app = apply(slow_router(), &config, &responder);
        let req = Request::builder()
            .uri("/fast")
            .header(header::CONTENT_LENGTH, "4")
            .body(Body::from("abcd"))
            .unwrap();

        let res = app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn other_layer_errors_reach_the_injected_log() {
        let (log, responder) = recording();

        let res = handle_layer_error(&responder, "upstream exploded".into());

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(res).await,
            json!({"error": "internal server error"})
        );
        assert_eq!(
            log.entries(),
            vec![
                "cause: upstream exploded".to_string(),
                "5xx: internal server error".to_string(),
            ]
        );
    }

    #[test]
    fn elapsed_is_a_timeout() {
        let (_, responder) = recording();
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());

        let res = handle_layer_error(&responder, err);

        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
