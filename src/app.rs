/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config → AppState → Router assembly
 * - Apply middleware (request id, trace, limits, then security headers outermost)
 * - Start axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::fallback};
use crate::config::Config;
use crate::middleware;
use crate::services::respond::Responder;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG overrides, e.g. RUST_LOG=apikey_gate=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");
        if abort_on_panic {
            process::abort();
        }
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = AppState::new(Responder::default());
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let responder = state.responder.clone();
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .fallback(fallback::not_found)
        .with_state(state);

    let router = middleware::http::apply(router, config, &responder);
    middleware::security_headers::apply(router)
}
