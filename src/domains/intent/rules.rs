//! Deterministic rule-based intent classifier.
//!
//! A keyword table standing in for the model-driven classifier: availability
//! phrasing wins over recommendation phrasing, which wins over category
//! navigation. Category names are matched case-insensitively against the
//! tenant's own menu so the returned match is always verbatim-cased.

use async_trait::async_trait;

use super::classifier::{ClassifierError, Dietary, IntentClassifier, IntentKind, MenuIntent};
use crate::domains::tenants::TenantContext;

const AVAILABILITY_PHRASES: &[&str] = &["do you have", "is there", "got any", "available"];

const RECOMMENDATION_PHRASES: &[&str] =
    &["recommend", "suggest", "what's good", "whats good", "best", "popular"];

const NAVIGATION_PHRASES: &[&str] = &["show", "browse", "go to", "open", "list", "menu"];

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "you", "your", "have", "what", "whats", "with", "can", "get", "want",
    "like", "some", "something", "please", "there", "any", "all", "are", "our", "give", "tell",
    "about", "options", "option", "items", "item", "food", "order", "veg", "vegetarian",
    "veggie", "non", "nonveg",
];

/// The deterministic classifier shipped with the server.
#[derive(Debug, Default)]
pub struct RuleClassifier;

impl RuleClassifier {
    pub fn new() -> Self {
        Self
    }

    fn classify_sync(query: &str, tenant: &TenantContext) -> MenuIntent {
        let lower = query.to_lowercase();
        let dietary = detect_dietary(&lower);
        let tokens = significant_tokens(&lower);
        let category_match = match_category(&lower, &tokens, tenant);

        if AVAILABILITY_PHRASES.iter().any(|p| lower.contains(p)) {
            return MenuIntent {
                kind: IntentKind::Availability,
                category_match: None,
                dietary,
                terms: tokens,
            };
        }

        if RECOMMENDATION_PHRASES.iter().any(|p| lower.contains(p)) {
            return MenuIntent {
                kind: IntentKind::Recommendation,
                category_match: None,
                dietary,
                terms: tokens,
            };
        }

        let navigation = NAVIGATION_PHRASES.iter().any(|p| lower.contains(p));
        if category_match.is_some() {
            return MenuIntent {
                kind: IntentKind::CategoryFilter,
                category_match,
                dietary,
                terms: tokens,
            };
        }
        if navigation {
            // "show me the menu" and friends want the whole listing, not a
            // category miss.
            if lower.contains("menu") {
                return MenuIntent {
                    kind: IntentKind::Other,
                    category_match: None,
                    dietary,
                    terms: tokens,
                };
            }
            return MenuIntent {
                kind: IntentKind::CategoryFilter,
                category_match: None,
                dietary,
                terms: tokens,
            };
        }

        if dietary.is_some() {
            return MenuIntent {
                kind: IntentKind::Recommendation,
                category_match: None,
                dietary,
                terms: tokens,
            };
        }

        MenuIntent {
            kind: IntentKind::Other,
            category_match: None,
            dietary,
            terms: tokens,
        }
    }
}

#[async_trait]
impl IntentClassifier for RuleClassifier {
    async fn classify(
        &self,
        query: &str,
        tenant: &TenantContext,
    ) -> Result<MenuIntent, ClassifierError> {
        Ok(Self::classify_sync(query, tenant))
    }
}

/// Non-veg phrasing is checked first; a bare "veg" token otherwise flags
/// the vegetarian constraint.
fn detect_dietary(lower: &str) -> Option<Dietary> {
    let normalized = lower.replace('-', " ");
    if normalized.contains("non veg") || normalized.split_whitespace().any(|t| t == "nonveg") {
        return Some(Dietary::NonVeg);
    }
    if normalized
        .split_whitespace()
        .any(|t| matches!(t, "veg" | "vegetarian" | "veggie"))
    {
        return Some(Dietary::Veg);
    }
    None
}

fn significant_tokens(lower: &str) -> Vec<String> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3 && !STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Find the first menu category the query names, verbatim-cased.
fn match_category(lower: &str, tokens: &[String], tenant: &TenantContext) -> Option<String> {
    for category in tenant.categories() {
        let cat_lower = category.to_lowercase();
        if lower.contains(&cat_lower) {
            return Some(category.to_string());
        }
        // Singular token vs plural category ("burger" -> "Burgers").
        if tokens.iter().any(|t| t.len() >= 4 && cat_lower.contains(t.as_str())) {
            return Some(category.to_string());
        }
    }
    None
}
