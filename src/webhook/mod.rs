//! Webhook handlers for external integrations
//!
//! ## Modules
//!
//! - [`cors`] - permissive CORS headers and preflight handling for every route
//! - [`hik`] - HikVision event subscription (URL challenge and event notifications)
//! - [`routes`] - mounts the handlers on an ntex [`web::ServiceConfig`](ntex::web::ServiceConfig)
//!
//! ## Security
//!
//! None of these endpoints are authenticated and the `signature` sent with the
//! URL challenge is not verified. Exposure must be restricted upstream.

pub mod cors;
pub mod hik;
pub mod routes;

use crate::{
    config::AppConfig,
    services::{self, event_log::EventLog},
};

/// State shared by every worker. Clones share the same diagnostic log.
#[derive(Clone)]
pub struct AppState {
    pub service_name: String,
    pub status_recent_events: usize,
    pub event_log: EventLog,
    pub event_handler: services::ImplEventHandler,
}

impl AppState {
    pub fn new(app_config: &AppConfig, event_handler: services::ImplEventHandler) -> Self {
        Self {
            service_name: app_config.service_name.clone(),
            status_recent_events: app_config.status_recent_events,
            event_log: EventLog::new(app_config.event_log_capacity),
            event_handler,
        }
    }
}
