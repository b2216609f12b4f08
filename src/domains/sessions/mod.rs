//! Sessions domain module.
//!
//! One user's ongoing interaction, addressed by an opaque identifier:
//! the session record (phase, browsing context, cart, notes) and the
//! process-lifetime store that owns the records.

mod record;
mod store;

pub use record::{Phase, SessionRecord};
pub use store::{lock_session, SessionStore, SharedSession};
