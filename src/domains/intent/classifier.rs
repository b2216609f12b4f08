//! Intent classifier contract.
//!
//! The classifier maps a free-text menu query plus the tenant's menu context
//! to a structured [`MenuIntent`]. The richer deployment plugs an external
//! model in behind this trait; the deterministic default is
//! [`super::RuleClassifier`]. Implementations must bound their own I/O; the
//! caller additionally enforces a request-level timeout and substitutes a
//! neutral intent on any failure.

use async_trait::async_trait;
use thiserror::Error;

use crate::domains::tenants::TenantContext;

/// What the user is trying to do with the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    /// Browse a whole section of the menu.
    CategoryFilter,
    /// Ask for item suggestions.
    Recommendation,
    /// Check whether specific items exist.
    Availability,
    /// Anything else; answered with the raw menu listing.
    Other,
}

/// Dietary constraint detected in a query. Once detected it is a hard
/// filter, never a soft preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dietary {
    Veg,
    NonVeg,
}

/// Structured result of classifying one query.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuIntent {
    pub kind: IntentKind,

    /// For `CategoryFilter`: the matched category, verbatim-cased as stored
    /// in the menu. `None` when the intent is navigation but nothing matched.
    pub category_match: Option<String>,

    pub dietary: Option<Dietary>,

    /// Significant search terms for item matching.
    pub terms: Vec<String>,
}

impl MenuIntent {
    /// The neutral intent substituted when classification fails: no items,
    /// no category, answered with the raw menu.
    pub fn other() -> Self {
        Self {
            kind: IntentKind::Other,
            category_match: None,
            dietary: None,
            terms: Vec::new(),
        }
    }
}

/// Errors an intent classifier can surface.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The classifier did not answer within its own deadline.
    #[error("classifier timed out")]
    Timeout,

    /// The classifier answered with output that does not parse.
    #[error("classifier returned malformed output: {0}")]
    Malformed(String),

    /// The classifier backend could not be reached.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Maps free text plus menu context to a structured intent.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        query: &str,
        tenant: &TenantContext,
    ) -> Result<MenuIntent, ClassifierError>;
}
