//! Intent domain module.
//!
//! The classifier seam between free text and the menu engine. The trait is
//! the boundary an external model-backed classifier would implement; the
//! shipped implementation is a deterministic rules table. Classification
//! failures never abort a request: [`classify_or_neutral`] bounds the call
//! with a timeout and substitutes the neutral intent so the rest of the
//! pipeline proceeds deterministically.

mod classifier;
mod rules;

pub use classifier::{ClassifierError, Dietary, IntentClassifier, IntentKind, MenuIntent};
pub use rules::RuleClassifier;

use std::time::Duration;

use tracing::warn;

use crate::domains::tenants::TenantContext;

/// Classify a query, absorbing timeouts and classifier failures into the
/// neutral intent.
pub async fn classify_or_neutral(
    classifier: &dyn IntentClassifier,
    timeout: Duration,
    query: &str,
    tenant: &TenantContext,
) -> MenuIntent {
    match tokio::time::timeout(timeout, classifier.classify(query, tenant)).await {
        Ok(Ok(intent)) => intent,
        Ok(Err(e)) => {
            warn!(query, "intent classifier failed, substituting neutral intent: {e}");
            MenuIntent::other()
        }
        Err(_) => {
            warn!(query, "intent classifier timed out, substituting neutral intent");
            MenuIntent::other()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct SlowClassifier;

    #[async_trait]
    impl IntentClassifier for SlowClassifier {
        async fn classify(
            &self,
            _query: &str,
            _tenant: &TenantContext,
        ) -> Result<MenuIntent, ClassifierError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(MenuIntent::other())
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl IntentClassifier for FailingClassifier {
        async fn classify(
            &self,
            _query: &str,
            _tenant: &TenantContext,
        ) -> Result<MenuIntent, ClassifierError> {
            Err(ClassifierError::Malformed("not json".to_string()))
        }
    }

    #[test]
    fn test_timeout_substitutes_neutral_intent() {
        let tenant = TenantContext::default();
        let intent = tokio_test::block_on(classify_or_neutral(
            &SlowClassifier,
            Duration::from_millis(10),
            "recommend something",
            &tenant,
        ));
        assert_eq!(intent, MenuIntent::other());
    }

    #[test]
    fn test_failure_substitutes_neutral_intent() {
        let tenant = TenantContext::default();
        let intent = tokio_test::block_on(classify_or_neutral(
            &FailingClassifier,
            Duration::from_millis(100),
            "recommend something",
            &tenant,
        ));
        assert_eq!(intent, MenuIntent::other());
    }

    #[test]
    fn test_successful_classification_passes_through() {
        let tenant = TenantContext::default();
        let intent = tokio_test::block_on(classify_or_neutral(
            &RuleClassifier::new(),
            Duration::from_millis(100),
            "recommend something",
            &tenant,
        ));
        assert_eq!(intent.kind, IntentKind::Recommendation);
    }
}
