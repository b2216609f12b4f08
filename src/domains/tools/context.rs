//! Shared tool context.
//!
//! The collaborators every tool call needs: the session store, the tenant
//! catalog and the intent classifier. Tools receive this context through
//! their routes instead of reaching for ambient globals, so tests can wire
//! in static sources and fake classifiers.

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::Config;
use crate::domains::intent::{IntentClassifier, RuleClassifier};
use crate::domains::sessions::SessionStore;
use crate::domains::tenants::{HttpTenantSource, TenantCatalog, TenantContext, TenantError};

/// Dependencies shared by all tool invocations.
pub struct ToolContext {
    config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub tenants: Arc<TenantCatalog>,
    pub classifier: Arc<dyn IntentClassifier>,
}

impl ToolContext {
    /// Production wiring: HTTP tenant source and the rule classifier.
    pub fn new(config: Arc<Config>) -> Self {
        let source = HttpTenantSource::new(
            config.tenant.source_url.clone(),
            Duration::from_secs(config.tenant.fetch_timeout_secs),
        );
        Self {
            sessions: Arc::new(SessionStore::new()),
            tenants: Arc::new(TenantCatalog::new(Box::new(source))),
            classifier: Arc::new(RuleClassifier::new()),
            config,
        }
    }

    /// Explicit wiring, used by tests and alternate deployments.
    pub fn with_parts(
        config: Arc<Config>,
        sessions: Arc<SessionStore>,
        tenants: Arc<TenantCatalog>,
        classifier: Arc<dyn IntentClassifier>,
    ) -> Self {
        Self {
            config,
            sessions,
            tenants,
            classifier,
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Bounded deadline for one classifier call.
    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.config.classifier.timeout_ms)
    }

    /// Resolve one tenant's context off the async thread.
    ///
    /// The catalog's HTTP source uses a blocking client, so the (one-time)
    /// fetch runs under `spawn_blocking`; cached reads return immediately.
    pub async fn tenant_context(&self, tenant_key: &str) -> Result<TenantContext, TenantError> {
        let tenants = Arc::clone(&self.tenants);
        let key = tenant_key.to_string();
        match tokio::task::spawn_blocking(move || tenants.context_for(&key).cloned()).await {
            Ok(result) => result,
            Err(e) => Err(TenantError::fetch(format!("tenant lookup task failed: {e}"))),
        }
    }
}
