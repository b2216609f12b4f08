//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur while bringing up or running a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TCP listener could not bind its address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP service failed to initialize on a connection.
    #[error("server initialization error: {0}")]
    Init(String),

    /// The MCP service terminated with an error.
    #[error("service error: {0}")]
    Service(String),

    /// IO error during transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    /// Create an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }
}
