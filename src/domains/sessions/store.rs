//! In-memory session store.
//!
//! Maps session identifiers to live session records for the process
//! lifetime. Records are created lazily on first reference and never
//! evicted (unbounded growth is an accepted limitation of this store).
//!
//! Each record sits behind its own mutex, acquired for the whole request:
//! the serving layer may dispatch concurrent calls for the same session id,
//! and the coarse lock prevents lost cart updates.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use tracing::info;

use super::record::SessionRecord;

/// Handle to one session's record.
pub type SharedSession = Arc<Mutex<SessionRecord>>;

/// Concurrent map of session id to session record.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SharedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the record for `session_id`, creating it on first reference.
    pub fn get_or_create(&self, session_id: &str) -> SharedSession {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!("Creating new session: {}", session_id);
                Arc::new(Mutex::new(SessionRecord::new()))
            })
            .value()
            .clone()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Lock a session record for the duration of a request.
///
/// A poisoned mutex means a previous request panicked mid-mutation; the
/// record is still structurally valid (quantities are unsigned and purged
/// after each command), so the lock is recovered rather than propagated.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, SessionRecord> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::sessions::record::Phase;

    #[test]
    fn test_get_or_create_creates_once() {
        let store = SessionStore::new();
        assert!(store.is_empty());

        let first = store.get_or_create("abc");
        lock_session(&first).phase = Phase::Ordering;

        let second = store.get_or_create("abc");
        assert_eq!(lock_session(&second).phase, Phase::Ordering);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.get_or_create("a");
        let b = store.get_or_create("b");

        lock_session(&a).cart.insert("101".to_string(), 2);
        assert!(lock_session(&b).cart.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_get_or_create_converges() {
        let store = Arc::new(SessionStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                let session = store.get_or_create("shared");
                let mut record = lock_session(&session);
                let count = record.cart.entry("101".to_string()).or_insert(0);
                *count += 1;
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let session = store.get_or_create("shared");
        assert_eq!(lock_session(&session).cart.get("101"), Some(&8));
        assert_eq!(store.len(), 1);
    }
}
