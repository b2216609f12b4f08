//! Menu domain module.
//!
//! Resolves classified menu queries against the tenant snapshot: category
//! navigation, dietary-constrained recommendations, and the raw-menu
//! fallback listing.

mod engine;

pub use engine::{MenuQueryEngine, MenuReply, MenuReplyKind};
