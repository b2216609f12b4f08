//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, providing consistent error handling
//! across the entire application.
//!
//! Note that the tool boundary absorbs failures into user-facing text; this
//! type is the surface for embedding the crate as a library and for wiring
//! code that runs before a tool call exists.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tenant store.
    #[error("Tenant error: {0}")]
    Tenant(#[from] crate::domains::tenants::TenantError),

    /// Error originating from the intent classifier.
    #[error("Classifier error: {0}")]
    Classifier(#[from] crate::domains::intent::ClassifierError),

    /// A cart command failed to parse.
    #[error("Command error: {0}")]
    Command(#[from] crate::domains::orders::CommandParseError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
