//! Per-session ordering state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse lifecycle stage of a session's ordering flow.
///
/// `OrderPlaced` is sticky: once an order is placed, cart modifications are
/// still permitted, but the phase only leaves `OrderPlaced` through a
/// confirmed cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Idle,
    MenuBrowsing,
    Ordering,
    OrderPlaced,
}

/// Mutable state for one session, created lazily on first reference.
///
/// Cart invariant: no entry ever holds a quantity of zero. Mutating code
/// calls [`SessionRecord::purge_empty_lines`] after every change so a
/// zero result deletes the entry rather than storing it.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub phase: Phase,

    /// Last category the user was browsing; empty string means none.
    pub current_category: String,

    /// Canonical item id -> positive quantity.
    pub cart: HashMap<String, u32>,

    /// Freeform customization phrases, semicolon-separated, append-only.
    pub customization_notes: String,

    /// When the current order was placed, if the phase is `OrderPlaced`.
    pub placed_at: Option<DateTime<Utc>>,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            current_category: String::new(),
            cart: HashMap::new(),
            customization_notes: String::new(),
            placed_at: None,
        }
    }
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a customization phrase, never overwriting earlier ones.
    pub fn append_note(&mut self, note: &str) {
        let note = note.trim();
        if note.is_empty() {
            return;
        }
        if self.customization_notes.is_empty() {
            self.customization_notes = note.to_string();
        } else {
            self.customization_notes.push_str("; ");
            self.customization_notes.push_str(note);
        }
    }

    /// Drop cart lines whose quantity reached zero.
    pub fn purge_empty_lines(&mut self) {
        self.cart.retain(|_, qty| *qty > 0);
    }

    /// Advance into `Ordering` after a successful cart mutation.
    /// `OrderPlaced` is sticky and never regresses.
    pub fn advance_to_ordering(&mut self) {
        if self.phase != Phase::OrderPlaced {
            self.phase = Phase::Ordering;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_idle_and_empty() {
        let record = SessionRecord::new();
        assert_eq!(record.phase, Phase::Idle);
        assert!(record.current_category.is_empty());
        assert!(record.cart.is_empty());
        assert!(record.customization_notes.is_empty());
        assert!(record.placed_at.is_none());
    }

    #[test]
    fn test_append_note_accumulates() {
        let mut record = SessionRecord::new();
        record.append_note("extra spicy");
        record.append_note("no onions");
        record.append_note("  ");
        assert_eq!(record.customization_notes, "extra spicy; no onions");
    }

    #[test]
    fn test_purge_empty_lines() {
        let mut record = SessionRecord::new();
        record.cart.insert("101".to_string(), 2);
        record.cart.insert("102".to_string(), 0);
        record.purge_empty_lines();
        assert_eq!(record.cart.len(), 1);
        assert_eq!(record.cart.get("101"), Some(&2));
    }

    #[test]
    fn test_advance_to_ordering() {
        let mut record = SessionRecord::new();
        record.advance_to_ordering();
        assert_eq!(record.phase, Phase::Ordering);

        record.phase = Phase::MenuBrowsing;
        record.advance_to_ordering();
        assert_eq!(record.phase, Phase::Ordering);
    }

    #[test]
    fn test_order_placed_is_sticky() {
        let mut record = SessionRecord::new();
        record.phase = Phase::OrderPlaced;
        record.advance_to_ordering();
        assert_eq!(record.phase, Phase::OrderPlaced);
    }
}
