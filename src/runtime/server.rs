//! Server mode
//!
//! Builds the actix-web app and runs it until a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::{Method, header};
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::configure;
use crate::config::{CorsConfig, StaticConfig};
use crate::runtime::{shutdown, startup};

/// Validate CORS configuration at startup (runs once, not per worker)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }
    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
             No cross-origin requests will be allowed."
        );
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // disabled: browser same-origin policy
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default();
    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods([
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
    .expose_headers([
        "ratelimit-limit",
        "ratelimit-remaining",
        "ratelimit-reset",
        "retry-after",
        "x-request-id",
    ])
    .max_age(cors_config.max_age as usize)
}

/// Run the HTTP server
///
/// **Note**: Logging must be initialized before calling this function.
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let state = startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .wrap(RequestIdMiddleware)
            // outermost, so preflights never reach the routes
            .wrap(build_cors_middleware(&cors_config))
            .configure(|cfg| configure(cfg, &state))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .shutdown_timeout(10)
    .disable_signals()
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::spawn(shutdown::listen_for_shutdown(server.handle()));

    server.await.context("HTTP server error")?;
    Ok(())
}
