//! Tenant context sources.
//!
//! A [`TenantSource`] performs the one-time bulk read of every tenant's
//! configuration from the backing document store. The HTTP source talks to a
//! store export endpoint with a bounded timeout; the static source serves a
//! fixed map and backs tests and demos.
//!
//! The HTTP client is `reqwest::blocking`, so `fetch_all` must be driven
//! from `tokio::task::spawn_blocking` when called inside the async server.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::error::TenantError;
use super::model::{MenuItem, TenantContext};

/// Read-only bulk access to tenant configuration.
pub trait TenantSource: Send + Sync {
    /// Fetch every tenant context, keyed by tenant key.
    fn fetch_all(&self) -> Result<HashMap<String, TenantContext>, TenantError>;
}

// ============================================================================
// Document shape
// ============================================================================

/// Raw tenant document as exported by the store.
#[derive(Debug, Deserialize)]
struct TenantDocument {
    tenant_key: String,
    context: RawContext,
}

#[derive(Debug, Deserialize)]
struct RawContext {
    #[serde(default)]
    meta_data: RawMetaData,
    #[serde(default)]
    menu: Vec<MenuItem>,
    #[serde(default)]
    keyterms: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetaData {
    ai_name: Option<String>,
    outlet_name: Option<String>,
}

impl From<TenantDocument> for TenantContext {
    fn from(doc: TenantDocument) -> Self {
        let defaults = TenantContext::default();
        Self {
            ai_name: doc.context.meta_data.ai_name.unwrap_or(defaults.ai_name),
            outlet_name: doc
                .context
                .meta_data
                .outlet_name
                .unwrap_or(defaults.outlet_name),
            menu: doc.context.menu,
            keyterms: doc.context.keyterms,
        }
    }
}

/// Parse a store export payload (a JSON array of tenant documents).
///
/// Documents missing the tenant key or context are skipped rather than
/// failing the batch; duplicate keys keep the last document, matching the
/// store's own upsert behavior.
fn parse_documents(payload: &str) -> Result<HashMap<String, TenantContext>, TenantError> {
    let docs: Vec<serde_json::Value> =
        serde_json::from_str(payload).map_err(|e| TenantError::malformed(e.to_string()))?;

    let mut contexts = HashMap::with_capacity(docs.len());
    for raw in docs {
        match serde_json::from_value::<TenantDocument>(raw) {
            Ok(doc) => {
                let key = doc.tenant_key.clone();
                debug!(tenant_key = %key, items = doc.context.menu.len(), "parsed tenant document");
                contexts.insert(key, TenantContext::from(doc));
            }
            Err(e) => debug!("skipping malformed tenant document: {e}"),
        }
    }
    Ok(contexts)
}

// ============================================================================
// HTTP source
// ============================================================================

/// Tenant source backed by a document-store HTTP export endpoint.
pub struct HttpTenantSource {
    url: Option<String>,
    timeout: Duration,
}

impl HttpTenantSource {
    /// Create a source for the given endpoint. `url = None` means the
    /// deployment never configured a store; every fetch reports that as a
    /// configuration error rather than an empty catalog.
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        Self { url, timeout }
    }
}

impl TenantSource for HttpTenantSource {
    fn fetch_all(&self) -> Result<HashMap<String, TenantContext>, TenantError> {
        let url = self.url.as_deref().ok_or(TenantError::NotConfigured)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TenantError::fetch(e.to_string()))?;

        let body = client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| TenantError::fetch(e.to_string()))?;

        let contexts = parse_documents(&body)?;
        info!("Loaded contexts for {} tenants", contexts.len());
        Ok(contexts)
    }
}

// ============================================================================
// Static source
// ============================================================================

/// Tenant source serving a fixed, in-memory map.
pub struct StaticTenantSource {
    contexts: HashMap<String, TenantContext>,
}

impl StaticTenantSource {
    pub fn new(contexts: HashMap<String, TenantContext>) -> Self {
        Self { contexts }
    }

    /// Convenience constructor for a single tenant.
    pub fn single(tenant_key: impl Into<String>, context: TenantContext) -> Self {
        let mut contexts = HashMap::new();
        contexts.insert(tenant_key.into(), context);
        Self::new(contexts)
    }
}

impl TenantSource for StaticTenantSource {
    fn fetch_all(&self) -> Result<HashMap<String, TenantContext>, TenantError> {
        Ok(self.contexts.clone())
    }
}
