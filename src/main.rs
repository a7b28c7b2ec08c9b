//! # HikVision Event Subscription Webhook
//!
//! Main entry point of the webhook receiver for the HikVision (海康互联)
//! event subscription. Configures logging, the shared diagnostic log and the
//! HTTP server.

#![recursion_limit = "256"]

pub mod config;
pub mod consts;
pub mod errors;
pub mod metric;
pub mod models;
pub mod services;
pub mod utils;
pub mod webhook;

use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use std::sync::Arc;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    let app_config = config::load_config()?;

    // Initialize logging and metrics, export only when a token is configured
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if let Some(token) = &app_config.logfire_token {
        logfire_config = logfire_config.with_token(token.clone());
    }
    let shutdown_handler = logfire_config.finish()?;

    // Shared state: one diagnostic log for every worker
    let app_state = webhook::AppState::new(
        &app_config,
        Arc::new(services::event_handler::LoggingEventHandler),
    );

    configure_and_run_server(&app_config, app_state).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: &config::AppConfig,
    app_state: webhook::AppState,
) -> anyhow::Result<()> {
    let server_addr = app_config.bind_addr();
    let webhook_path = app_config.normalized_webhook_path();

    logfire::info!(
        "Starting {service} on {host}:{port}, webhook at {path}, keeping {capacity} records",
        service = app_config.service_name.clone(),
        capacity = app_state.event_log.capacity() as i64,
        host = server_addr.0.clone(),
        port = server_addr.1 as i64,
        path = webhook_path.clone()
    );

    webhook::hik::routes::install_panic_trace_hook();
    let max_body_bytes = app_config.max_body_bytes;

    let server = web::server(move || {
        let webhook_path = webhook_path.clone();

        web::App::new()
            .wrap(webhook::cors::cors_headers())
            .wrap(web::middleware::Logger::default())
            .state(app_state.clone())
            .configure(|cfg| webhook::routes::hik_events(cfg, &webhook_path, max_body_bytes))
            .default_service(web::route().to(webhook::cors::preflight_or_not_found))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor(app_config)?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
