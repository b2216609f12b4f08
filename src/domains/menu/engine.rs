//! Menu query engine.
//!
//! Answers "what is on the menu" and "what do you recommend" against the
//! tenant's snapshot and the session's browsing context. The engine never
//! fabricates items: every name it returns comes from the supplied menu.

use tracing::warn;

use crate::domains::intent::{Dietary, IntentKind, MenuIntent};
use crate::domains::sessions::{Phase, SessionRecord};
use crate::domains::tenants::{format_price, MenuItem, TenantContext};

/// Recommendations stay small; the assistant reads them out loud.
const MAX_RECOMMENDATIONS: usize = 3;

/// Raw-menu listings are capped to keep the snapshot bounded.
const MAX_LISTED_ITEMS: usize = 80;

/// Shape of one menu answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuReplyKind {
    /// The tenant has no menu data at all.
    NoMenuData,
    /// Navigated into a category.
    Category,
    /// Navigation intent, but no category matched.
    CategoryMiss,
    /// A small recommended/available item set.
    Items,
    /// Nothing matched the request (including dietary dead ends).
    NothingFound,
    /// The raw menu listing, for the calling model to parse.
    FullMenu,
}

/// One answer from the engine.
#[derive(Debug, Clone)]
pub struct MenuReply {
    pub kind: MenuReplyKind,
    /// Resolved category, verbatim-cased, when one applies.
    pub category: Option<String>,
    /// Display names of returned items.
    pub item_names: Vec<String>,
    /// Set when matching items spanned more than one category.
    pub mixed_categories: bool,
    pub transcript: String,
}

impl MenuReply {
    fn text(kind: MenuReplyKind, transcript: impl Into<String>) -> Self {
        Self {
            kind,
            category: None,
            item_names: Vec::new(),
            mixed_categories: false,
            transcript: transcript.into(),
        }
    }
}

pub struct MenuQueryEngine;

impl MenuQueryEngine {
    /// Answer one classified query, updating the session's browsing context.
    pub fn answer(
        intent: &MenuIntent,
        tenant: &TenantContext,
        session: &mut SessionRecord,
    ) -> MenuReply {
        if tenant.menu.is_empty() {
            // No session mutation on a tenant without data.
            return MenuReply::text(
                MenuReplyKind::NoMenuData,
                "I'm sorry, I couldn't find any menu data for this restaurant.",
            );
        }

        session.phase = Phase::MenuBrowsing;

        match intent.kind {
            IntentKind::CategoryFilter => Self::navigate(intent, tenant, session),
            IntentKind::Recommendation | IntentKind::Availability => {
                Self::recommend(intent, tenant, session)
            }
            IntentKind::Other => Self::full_menu(tenant),
        }
    }

    fn navigate(
        intent: &MenuIntent,
        tenant: &TenantContext,
        session: &mut SessionRecord,
    ) -> MenuReply {
        let Some(category) = intent.category_match.as_deref() else {
            return MenuReply::text(
                MenuReplyKind::CategoryMiss,
                "I couldn't find that category. Please allow me to show you the main menu.",
            );
        };

        session.current_category = category.to_string();

        let lines: Vec<String> = tenant
            .menu
            .iter()
            .filter(|m| m.category.eq_ignore_ascii_case(category))
            .map(item_line)
            .collect();
        let names: Vec<String> = tenant
            .menu
            .iter()
            .filter(|m| m.category.eq_ignore_ascii_case(category))
            .map(|m| m.name.clone())
            .collect();

        MenuReply {
            kind: MenuReplyKind::Category,
            category: Some(category.to_string()),
            item_names: names,
            mixed_categories: false,
            transcript: format!("Here is our {} menu.\n{}", category, lines.join("\n")),
        }
    }

    fn recommend(
        intent: &MenuIntent,
        tenant: &TenantContext,
        session: &mut SessionRecord,
    ) -> MenuReply {
        let candidates: Vec<&MenuItem> = tenant
            .menu
            .iter()
            .filter(|m| match intent.dietary {
                Some(Dietary::Veg) => m.is_veg,
                Some(Dietary::NonVeg) => !m.is_veg,
                None => true,
            })
            .collect();

        let matches: Vec<&MenuItem> = if !intent.terms.is_empty() {
            candidates
                .iter()
                .copied()
                .filter(|m| matches_terms(m, &intent.terms))
                .collect()
        } else if !session.current_category.is_empty() {
            // No terms of its own: recommend from the category being browsed.
            let current = session.current_category.clone();
            candidates
                .iter()
                .copied()
                .filter(|m| m.category.eq_ignore_ascii_case(&current))
                .collect()
        } else {
            first_category_items(&candidates)
        };

        if matches.is_empty() {
            let transcript = match intent.dietary {
                Some(Dietary::Veg) => {
                    "I couldn't find any Vegetarian options for that.".to_string()
                }
                Some(Dietary::NonVeg) => {
                    "I couldn't find any Non-Vegetarian options for that.".to_string()
                }
                None => "I couldn't find anything matching that request.".to_string(),
            };
            return MenuReply::text(MenuReplyKind::NothingFound, transcript);
        }

        // All returned items must share one category; the first match anchors it.
        let anchor = matches[0].category.clone();
        let mixed = matches
            .iter()
            .any(|m| !m.category.eq_ignore_ascii_case(&anchor));
        if mixed {
            warn!(category = %anchor, "mixed categories in recommendation, constraining to anchor");
        }

        let selected: Vec<&MenuItem> = matches
            .into_iter()
            .filter(|m| m.category.eq_ignore_ascii_case(&anchor))
            .take(MAX_RECOMMENDATIONS)
            .collect();

        if !anchor.is_empty() {
            session.current_category = anchor.clone();
        }

        let names: Vec<String> = selected.iter().map(|m| m.name.clone()).collect();
        MenuReply {
            kind: MenuReplyKind::Items,
            category: (!anchor.is_empty()).then_some(anchor),
            transcript: format!(
                "I found {}. Would you like to try them?",
                names.join(", ")
            ),
            item_names: names,
            mixed_categories: mixed,
        }
    }

    /// The "return everything" policy: the raw snapshot for the calling
    /// model to parse.
    fn full_menu(tenant: &TenantContext) -> MenuReply {
        let categories = tenant.categories().join(", ");
        let lines: Vec<String> = tenant
            .menu
            .iter()
            .take(MAX_LISTED_ITEMS)
            .map(|m| format!("{} - Category: {}", item_line(m), category_or_unknown(m)))
            .collect();

        MenuReply {
            kind: MenuReplyKind::FullMenu,
            category: None,
            item_names: tenant
                .menu
                .iter()
                .take(MAX_LISTED_ITEMS)
                .map(|m| m.name.clone())
                .collect(),
            mixed_categories: false,
            transcript: format!(
                "MENU for {}:\nAVAILABLE CATEGORIES: {}\n{}",
                tenant.outlet_name,
                categories,
                lines.join("\n")
            ),
        }
    }
}

fn item_line(item: &MenuItem) -> String {
    format!(
        "{} (ID: {}) - {} - {}",
        item.name,
        item.menu_id,
        format_price(item.price),
        if item.is_veg { "(Veg)" } else { "(Non-Veg)" }
    )
}

fn category_or_unknown(item: &MenuItem) -> &str {
    if item.category.is_empty() {
        "Unknown"
    } else {
        &item.category
    }
}

/// A term matches an item by name or category, tolerating a plural form.
fn matches_terms(item: &MenuItem, terms: &[String]) -> bool {
    let name = item.name.to_lowercase();
    let category = item.category.to_lowercase();
    terms.iter().any(|term| {
        let singular = term.trim_end_matches('s');
        name.contains(term.as_str())
            || (!singular.is_empty() && name.contains(singular))
            || category.contains(term.as_str())
            || (!singular.is_empty() && category.contains(singular))
    })
}

/// With no terms and no browsing context, recommend from the first category.
fn first_category_items<'a>(candidates: &[&'a MenuItem]) -> Vec<&'a MenuItem> {
    let mut categories: Vec<&str> = candidates
        .iter()
        .map(|m| m.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    categories.sort_unstable();

    match categories.first() {
        Some(first) => candidates
            .iter()
            .copied()
            .filter(|m| m.category.eq_ignore_ascii_case(first))
            .collect(),
        None => candidates.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::intent::MenuIntent;

    fn item(id: &str, name: &str, price: f64, is_veg: bool, category: &str) -> MenuItem {
        MenuItem {
            menu_id: id.to_string(),
            name: name.to_string(),
            price,
            is_veg,
            category: category.to_string(),
        }
    }

    fn tenant() -> TenantContext {
        TenantContext::with_menu(vec![
            item("101", "Classic Burger", 199.0, false, "Burgers"),
            item("102", "Veg Burger", 149.0, true, "Burgers"),
            item("201", "Paneer Tikka", 249.0, true, "Starters"),
            item("202", "Chicken Tikka", 279.0, false, "Starters"),
            item("301", "Kunafa", 149.0, true, "Desserts"),
        ])
    }

    fn intent(kind: IntentKind) -> MenuIntent {
        MenuIntent {
            kind,
            category_match: None,
            dietary: None,
            terms: Vec::new(),
        }
    }

    #[test]
    fn test_empty_menu_does_not_touch_session() {
        let tenant = TenantContext::default();
        let mut session = SessionRecord::new();
        let reply = MenuQueryEngine::answer(&MenuIntent::other(), &tenant, &mut session);

        assert_eq!(reply.kind, MenuReplyKind::NoMenuData);
        assert_eq!(session.phase, Phase::Idle);
    }

    #[test]
    fn test_phase_set_even_when_nothing_resolves() {
        let mut session = SessionRecord::new();
        let mut navigation = intent(IntentKind::CategoryFilter);
        navigation.category_match = None;
        let reply = MenuQueryEngine::answer(&navigation, &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::CategoryMiss);
        assert_eq!(session.phase, Phase::MenuBrowsing);
        assert!(session.current_category.is_empty());
    }

    #[test]
    fn test_category_navigation_updates_context() {
        let mut session = SessionRecord::new();
        let mut navigation = intent(IntentKind::CategoryFilter);
        navigation.category_match = Some("Burgers".to_string());
        let reply = MenuQueryEngine::answer(&navigation, &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::Category);
        assert_eq!(session.current_category, "Burgers");
        assert!(reply.transcript.contains("Here is our Burgers menu."));
        assert!(reply.transcript.contains("Classic Burger (ID: 101) - ₹199 - (Non-Veg)"));
    }

    #[test]
    fn test_recommendation_by_term() {
        let mut session = SessionRecord::new();
        let mut rec = intent(IntentKind::Availability);
        rec.terms = vec!["tikka".to_string()];
        let reply = MenuQueryEngine::answer(&rec, &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::Items);
        assert_eq!(reply.category.as_deref(), Some("Starters"));
        assert!(reply.item_names.contains(&"Paneer Tikka".to_string()));
        assert_eq!(session.current_category, "Starters");
    }

    #[test]
    fn test_recommendation_constrained_to_single_category() {
        let mut session = SessionRecord::new();
        let mut rec = intent(IntentKind::Recommendation);
        rec.terms = vec!["burger".to_string(), "kunafa".to_string()];
        let reply = MenuQueryEngine::answer(&rec, &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::Items);
        assert!(reply.mixed_categories);
        assert_eq!(reply.category.as_deref(), Some("Burgers"));
        assert!(!reply.item_names.contains(&"Kunafa".to_string()));
    }

    #[test]
    fn test_dietary_constraint_is_hard() {
        let mut session = SessionRecord::new();
        let mut rec = intent(IntentKind::Recommendation);
        rec.dietary = Some(Dietary::Veg);
        rec.terms = vec!["chicken".to_string()];
        let reply = MenuQueryEngine::answer(&rec, &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::NothingFound);
        assert!(reply.transcript.contains("Vegetarian"));
    }

    #[test]
    fn test_nothing_found_without_dietary() {
        let mut session = SessionRecord::new();
        let mut rec = intent(IntentKind::Availability);
        rec.terms = vec!["sushi".to_string()];
        let reply = MenuQueryEngine::answer(&rec, &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::NothingFound);
        assert!(reply.transcript.contains("couldn't find anything"));
    }

    #[test]
    fn test_recommendation_uses_browsing_context() {
        let mut session = SessionRecord::new();
        session.current_category = "Desserts".to_string();
        let reply = MenuQueryEngine::answer(&intent(IntentKind::Recommendation), &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::Items);
        assert_eq!(reply.item_names, vec!["Kunafa".to_string()]);
    }

    #[test]
    fn test_full_menu_fallback_lists_snapshot() {
        let mut session = SessionRecord::new();
        let reply = MenuQueryEngine::answer(&MenuIntent::other(), &tenant(), &mut session);

        assert_eq!(reply.kind, MenuReplyKind::FullMenu);
        assert!(reply.transcript.starts_with("MENU for Our Outlet:"));
        assert!(reply.transcript.contains("AVAILABLE CATEGORIES: Burgers, Desserts, Starters"));
        assert!(reply.transcript.contains("Kunafa (ID: 301) - ₹149 - (Veg) - Category: Desserts"));
        assert_eq!(reply.item_names.len(), 5);
    }

    #[test]
    fn test_recommendation_capped_to_small_set() {
        let mut menu = Vec::new();
        for i in 0..6 {
            menu.push(item(&format!("40{i}"), &format!("Falooda {i}"), 99.0, true, "Faloodas"));
        }
        let tenant = TenantContext::with_menu(menu);
        let mut session = SessionRecord::new();
        let mut rec = intent(IntentKind::Recommendation);
        rec.terms = vec!["falooda".to_string()];
        let reply = MenuQueryEngine::answer(&rec, &tenant, &mut session);

        assert_eq!(reply.item_names.len(), MAX_RECOMMENDATIONS);
    }
}
