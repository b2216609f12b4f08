//! Tenant context data model.
//!
//! A tenant is one restaurant whose menu and metadata are looked up by key.
//! Documents in the tenant store carry menu ids as either JSON numbers or
//! strings; ids are canonicalized to strings at deserialization time so all
//! downstream lookups compare one representation.

use serde::{Deserialize, Deserializer};

/// A single menu entry, read-only once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItem {
    /// Canonical identifier, stable across renames of the display name.
    #[serde(deserialize_with = "string_or_number")]
    pub menu_id: String,

    /// Display name shown to users.
    #[serde(alias = "item_name")]
    pub name: String,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub is_veg: bool,

    #[serde(default)]
    pub category: String,
}

/// One tenant's configuration: outlet metadata plus the menu snapshot.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub ai_name: String,
    pub outlet_name: String,
    pub menu: Vec<MenuItem>,
    pub keyterms: Vec<String>,
}

impl Default for TenantContext {
    fn default() -> Self {
        Self {
            ai_name: "Assistant".to_string(),
            outlet_name: "Our Outlet".to_string(),
            menu: Vec::new(),
            keyterms: Vec::new(),
        }
    }
}

impl TenantContext {
    /// Build a context around a menu snapshot, with default metadata.
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        Self {
            menu,
            ..Self::default()
        }
    }

    /// Look up an item by canonical identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&MenuItem> {
        let id = id.trim();
        self.menu.iter().find(|m| m.menu_id == id)
    }

    /// Look up an item by display name, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&MenuItem> {
        let name = name.trim();
        self.menu.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Resolve an item reference: canonical id first, then display name.
    pub fn resolve(&self, reference: &str) -> Option<&MenuItem> {
        self.find_by_id(reference)
            .or_else(|| self.find_by_name(reference))
    }

    /// Distinct category names, verbatim-cased as first seen, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.menu {
            let cat = item.category.trim();
            if !cat.is_empty() && !seen.iter().any(|c| c.eq_ignore_ascii_case(cat)) {
                seen.push(cat);
            }
        }
        seen.sort_unstable();
        seen
    }
}

/// Resolve an item reference against a raw menu slice.
///
/// Same resolution order as [`TenantContext::resolve`], usable where only
/// the menu snapshot is at hand.
pub fn resolve_item<'a>(menu: &'a [MenuItem], reference: &str) -> Option<&'a MenuItem> {
    let reference = reference.trim();
    menu.iter()
        .find(|m| m.menu_id == reference)
        .or_else(|| menu.iter().find(|m| m.name.eq_ignore_ascii_case(reference)))
}

/// Format a price for transcripts: whole rupees without decimals.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("₹{}", price as i64)
    } else {
        format!("₹{:.2}", price)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s.trim().to_string(),
    })
}
