//! Tenant-store error types.

use thiserror::Error;

/// Errors that can occur while loading or resolving tenant contexts.
#[derive(Debug, Error)]
pub enum TenantError {
    /// No document-store endpoint was configured.
    #[error("tenant source not configured (set MCP_TENANT_SOURCE_URL)")]
    NotConfigured,

    /// The fetch against the document store failed (network, timeout, HTTP status).
    #[error("failed to fetch tenant contexts: {0}")]
    Fetch(String),

    /// The store answered but the payload did not match the expected shape.
    #[error("malformed tenant document: {0}")]
    Malformed(String),

    /// The catalog loaded but contains no entry for the requested key.
    #[error("unknown tenant key: {0}")]
    UnknownTenant(String),
}

impl TenantError {
    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a malformed-document error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
