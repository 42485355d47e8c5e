//! Server configuration module

use clap::Parser;

use crate::config::{
    observability::{LoggingConfig, ObservabilityConfig},
    server::{DatabaseConfig, ServerRuntimeConfig},
    sweep::SweepConfig,
};

pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod sweep;

/// Bazaar JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "bazaar-json", about = "Bazaar JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request tracing settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Promotion status sweep settings.
    #[command(flatten)]
    pub sweep: SweepConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
