//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Tenant document-store configuration.
    pub tenant: TenantStoreConfig,

    /// Intent classifier configuration.
    pub classifier: ClassifierConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the tenant document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantStoreConfig {
    /// Export endpoint returning all tenant documents. When unset, every
    /// tenant lookup reports a configuration error.
    pub source_url: Option<String>,

    /// Bound on the one-time tenant fetch.
    pub fetch_timeout_secs: u64,
}

/// Configuration for the intent classifier boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Bound on one classifier call; on expiry the neutral intent is
    /// substituted and the request proceeds.
    pub timeout_ms: u64,
}

impl Default for TenantStoreConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            fetch_timeout_secs: 10,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { timeout_ms: 2000 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "food-order-bot".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            tenant: TenantStoreConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_TENANT_SOURCE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Tenant document store
        if let Ok(url) = std::env::var("MCP_TENANT_SOURCE_URL") {
            config.tenant.source_url = Some(url);
            info!("Tenant source URL loaded from environment");
        } else {
            warn!(
                "MCP_TENANT_SOURCE_URL not set - tenant lookups will report \
                 a configuration error until a document store is configured"
            );
        }

        if let Ok(timeout) = std::env::var("MCP_TENANT_FETCH_TIMEOUT_SECS") {
            config.tenant.fetch_timeout_secs =
                timeout.parse().unwrap_or(config.tenant.fetch_timeout_secs);
        }

        if let Ok(timeout) = std::env::var("MCP_CLASSIFIER_TIMEOUT_MS") {
            config.classifier.timeout_ms =
                timeout.parse().unwrap_or(config.classifier.timeout_ms);
        }

        config
    }
}
