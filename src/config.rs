//! Application configuration loaded from environment variables.
//!
//! Every field has a default so the service can start with an empty
//! environment on a developer machine. Production deployments set `ENV=prod`
//! and point the TLS paths at real files.
//!
//! # Security Notes
//! - `LOGFIRE_TOKEN` is the only sensitive value and must never be logged
//! - The webhook itself is unauthenticated; restrict exposure at the proxy

use anyhow::Context;
use envconfig::Envconfig;

use crate::consts;

/// Environment variables used to configure the webhook service.
#[derive(Envconfig, Clone, Debug)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "3000")]
    pub web_server_port: u16,

    /// Path the event subscription is registered under on the platform side
    #[envconfig(default = "/api/event")]
    pub webhook_path: String,

    /// Name reported by the GET status object
    #[envconfig(default = "HikVision Event Subscription")]
    pub service_name: String,

    /// Number of diagnostic records kept in memory
    #[envconfig(default = "100")]
    pub event_log_capacity: usize,

    /// Largest accepted event body in bytes, 4 MiB by default
    #[envconfig(default = "4194304")]
    pub max_body_bytes: usize,

    /// Number of diagnostic records echoed in the GET status object
    #[envconfig(default = "5")]
    pub status_recent_events: usize,

    /// Path to SSL private key file, only read when `env` is "prod"
    /// Security: File should have 600 permissions
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file, only read when `env` is "prod"
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: Logfire write token, export is disabled when unset
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    /// Webhook path with a single leading `/` and no trailing one
    pub fn normalized_webhook_path(&self) -> String {
        let trimmed = self.webhook_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return consts::DEFAULT_WEBHOOK_PATH.to_string();
        }

        format!("/{trimmed}")
    }
}

/// Reads the configuration from the process environment.
pub fn load_config() -> anyhow::Result<AppConfig> {
    AppConfig::init_from_env().context("failed to load app config from environment")
}
