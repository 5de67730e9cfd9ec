// ── Session store ──
//
// Injected key-value persistence for the console's small bits of state:
// the auth marker, the last active video id, and the per-session search
// cache. The production backend is in-memory; tests use the same.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::SearchRow;

/// Auth markers live this long before a re-check is required.
const AUTH_TTL_HOURS: i64 = 24;

const KEY_AUTHED: &str = "vigil:authed";
const KEY_AUTHED_EXPIRES: &str = "vigil:authed_expires";
const KEY_LAST_VIDEO: &str = "vigil:last_video_id";
const ASK_CACHE_PREFIX: &str = "vigil:ask:";

/// Minimal key-value persistence the console needs.
///
/// String-valued on purpose: structured entries are JSON-encoded by the
/// typed accessors in [`ConsoleSession`], so backends stay trivial.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
    /// Remove every key starting with `prefix`.
    fn clear_scope(&self, prefix: &str);
}

/// In-memory [`SessionStore`] backend.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear_scope(&self, prefix: &str) {
        self.entries.retain(|k, _| !k.starts_with(prefix));
    }
}

/// One cached "ask" search: restored on session activation, overwritten
/// after each successful query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskCacheEntry {
    pub query: String,
    pub answer: String,
    pub results: Vec<SearchRow>,
}

/// Typed view over a [`SessionStore`].
#[derive(Clone)]
pub struct ConsoleSession {
    store: Arc<dyn SessionStore>,
}

impl ConsoleSession {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// In-memory-backed session, the default for one console process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    // ── Auth marker ──────────────────────────────────────────────────

    /// Record that the operator authenticated; valid for 24 hours.
    pub fn mark_authenticated(&self) {
        let expires = Utc::now() + Duration::hours(AUTH_TTL_HOURS);
        self.store.set(KEY_AUTHED, "true".into());
        self.store.set(KEY_AUTHED_EXPIRES, expires.to_rfc3339());
    }

    /// Whether a non-expired auth marker exists. Expired markers are
    /// cleared on read.
    pub fn is_authenticated(&self) -> bool {
        if self.store.get(KEY_AUTHED).as_deref() != Some("true") {
            return false;
        }

        let live = self
            .store
            .get(KEY_AUTHED_EXPIRES)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .is_some_and(|expires| expires > Utc::now());

        if !live {
            debug!("auth marker expired, clearing");
            self.clear_auth();
        }
        live
    }

    pub fn clear_auth(&self) {
        self.store.remove(KEY_AUTHED);
        self.store.remove(KEY_AUTHED_EXPIRES);
    }

    // ── Last video ───────────────────────────────────────────────────

    pub fn last_video_id(&self) -> Option<String> {
        self.store.get(KEY_LAST_VIDEO)
    }

    pub fn set_last_video_id(&self, video_id: &str) {
        self.store.set(KEY_LAST_VIDEO, video_id.to_string());
    }

    // ── Ask cache ────────────────────────────────────────────────────

    /// The cached Q&A result for a session, if present and readable.
    /// Unreadable entries are ignored (they get overwritten on the next
    /// successful search).
    pub fn ask_cache(&self, session: &str) -> Option<AskCacheEntry> {
        let raw = self.store.get(&format!("{ASK_CACHE_PREFIX}{session}"))?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(session, error = %e, "ignoring unreadable ask cache entry");
                None
            }
        }
    }

    pub fn store_ask_cache(&self, session: &str, entry: &AskCacheEntry) {
        match serde_json::to_string(entry) {
            Ok(raw) => self.store.set(&format!("{ASK_CACHE_PREFIX}{session}"), raw),
            Err(e) => debug!(session, error = %e, "failed to encode ask cache entry"),
        }
    }

    /// Drop every cached search answer.
    pub fn clear_ask_cache(&self) {
        self.store.clear_scope(ASK_CACHE_PREFIX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_marker_round_trip() {
        let session = ConsoleSession::in_memory();
        assert!(!session.is_authenticated());

        session.mark_authenticated();
        assert!(session.is_authenticated());

        session.clear_auth();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn expired_auth_marker_is_cleared_on_read() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(KEY_AUTHED, "true".into());
        let expired = Utc::now() - Duration::hours(1);
        store.set(KEY_AUTHED_EXPIRES, expired.to_rfc3339());

        let session = ConsoleSession::new(store.clone());
        assert!(!session.is_authenticated());
        assert!(store.get(KEY_AUTHED).is_none());
        assert!(store.get(KEY_AUTHED_EXPIRES).is_none());
    }

    #[test]
    fn garbage_expiry_counts_as_expired() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(KEY_AUTHED, "true".into());
        store.set(KEY_AUTHED_EXPIRES, "not a timestamp".into());

        let session = ConsoleSession::new(store);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn last_video_id_round_trip() {
        let session = ConsoleSession::in_memory();
        assert!(session.last_video_id().is_none());

        session.set_last_video_id("vid42");
        assert_eq!(session.last_video_id().as_deref(), Some("vid42"));
    }

    #[test]
    fn ask_cache_round_trip_and_scoping() {
        let session = ConsoleSession::in_memory();
        let entry = AskCacheEntry {
            query: "what happened at 0:42".into(),
            answer: "A fight broke out near the entrance.".into(),
            results: Vec::new(),
        };

        session.store_ask_cache("vid1", &entry);
        assert_eq!(session.ask_cache("vid1"), Some(entry));
        assert!(session.ask_cache("vid2").is_none());
    }

    #[test]
    fn unreadable_ask_cache_is_ignored() {
        let store = Arc::new(MemorySessionStore::new());
        store.set("vigil:ask:vid1", "{not json".into());

        let session = ConsoleSession::new(store);
        assert!(session.ask_cache("vid1").is_none());
    }

    #[test]
    fn clear_scope_removes_only_prefixed_keys() {
        let store = MemorySessionStore::new();
        store.set("vigil:ask:a", "1".into());
        store.set("vigil:ask:b", "2".into());
        store.set("vigil:last_video_id", "vid1".into());

        store.clear_scope("vigil:ask:");
        assert!(store.get("vigil:ask:a").is_none());
        assert!(store.get("vigil:ask:b").is_none());
        assert_eq!(store.get("vigil:last_video_id").as_deref(), Some("vid1"));
    }
}
