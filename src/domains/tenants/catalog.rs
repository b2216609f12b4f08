//! Compute-once tenant catalog.
//!
//! The catalog wraps a [`TenantSource`] behind a process-lifetime cache.
//! Population is lazy and first-read-wins: concurrent first reads may both
//! fetch, but the `OnceLock` keeps exactly one result and every caller
//! converges on it. Failed fetches are never cached, so a later call retries
//! against the source.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::warn;

use super::error::TenantError;
use super::model::TenantContext;
use super::source::TenantSource;

/// Process-wide view of all tenant contexts.
pub struct TenantCatalog {
    source: Box<dyn TenantSource>,
    cache: OnceLock<HashMap<String, TenantContext>>,
}

impl TenantCatalog {
    pub fn new(source: Box<dyn TenantSource>) -> Self {
        Self {
            source,
            cache: OnceLock::new(),
        }
    }

    /// All tenant contexts, fetching on first use.
    pub fn contexts(&self) -> Result<&HashMap<String, TenantContext>, TenantError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let fetched = match self.source.fetch_all() {
            Ok(contexts) => contexts,
            Err(e) => {
                warn!("tenant catalog fetch failed: {e}");
                return Err(e);
            }
        };

        // A racing populate may have stored its copy first; both fetched the
        // same source, so serving the stored one keeps every reader converged.
        Ok(self.cache.get_or_init(|| fetched))
    }

    /// The context for one tenant key.
    pub fn context_for(&self, tenant_key: &str) -> Result<&TenantContext, TenantError> {
        self.contexts()?
            .get(tenant_key)
            .ok_or_else(|| TenantError::UnknownTenant(tenant_key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tenants::source::StaticTenantSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Source that counts fetches and can fail a configurable number of times.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail_first: usize,
    }

    impl TenantSource for CountingSource {
        fn fetch_all(&self) -> Result<HashMap<String, TenantContext>, TenantError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(TenantError::fetch("store unreachable"));
            }
            let mut contexts = HashMap::new();
            contexts.insert("spice-villa".to_string(), TenantContext::default());
            Ok(contexts)
        }
    }

    #[test]
    fn test_catalog_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let catalog = TenantCatalog::new(Box::new(CountingSource {
            calls: calls.clone(),
            fail_first: 0,
        }));

        assert!(catalog.contexts().is_ok());
        assert!(catalog.contexts().is_ok());
        assert!(catalog.context_for("spice-villa").is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_catalog_does_not_cache_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let catalog = TenantCatalog::new(Box::new(CountingSource {
            calls: calls.clone(),
            fail_first: 1,
        }));

        let err = catalog.contexts().unwrap_err();
        assert!(matches!(err, TenantError::Fetch(_)));

        // Second read retries and the success is cached from then on.
        assert!(catalog.contexts().is_ok());
        assert!(catalog.contexts().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_catalog_unknown_tenant() {
        let catalog = TenantCatalog::new(Box::new(StaticTenantSource::single(
            "known",
            TenantContext::default(),
        )));

        let err = catalog.context_for("missing").unwrap_err();
        assert!(matches!(err, TenantError::UnknownTenant(_)));
    }
}
