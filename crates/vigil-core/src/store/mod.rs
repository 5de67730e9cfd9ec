// ── Reactive alert set ──
//
// Insertion-ordered storage for one monitoring session's alerts, with
// push-based change notification via `watch`. Order matters here:
// fingerprint dedup keeps the first-seen record, so the map must
// remember arrival order across re-dedup passes.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::model::Alert;
use crate::stream::AlertSetStream;
use crate::triage::dedup_by_fingerprint;

/// The authoritative in-memory alert set for one session.
///
/// Owned by the ingestion coordinator; every mutation re-deduplicates by
/// fingerprint and rebuilds the snapshot subscribers receive.
pub struct AlertStore {
    /// Primary storage: alert id → alert, in arrival order.
    by_id: RwLock<IndexMap<String, Alert>>,

    /// Full snapshot, rebuilt on mutation for cheap subscription.
    snapshot: watch::Sender<Arc<Vec<Alert>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,
}

impl AlertStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);

        Self {
            by_id: RwLock::new(IndexMap::new()),
            snapshot,
            version,
        }
    }

    /// Replace the whole set with a fresh bulk-fetch result.
    ///
    /// The input is deduplicated by fingerprint (first-seen wins) before
    /// it becomes the new set.
    pub fn replace(&self, alerts: Vec<Alert>) {
        let deduped = dedup_by_fingerprint(alerts);
        {
            let mut map = self.by_id.write();
            map.clear();
            for alert in deduped {
                map.insert(alert.id.clone(), alert);
            }
        }
        self.publish();
    }

    /// Merge one push-delivered alert into the set.
    ///
    /// Skipped when an alert with the same id already exists; otherwise
    /// appended and the whole set re-deduplicated by fingerprint, which
    /// drops the newcomer again if it re-announces an existing detection
    /// under a new id. Returns `true` if the alert survived the merge.
    ///
    /// Merging is commutative and idempotent with respect to id and
    /// fingerprint, so bulk-fetch seeding and push delivery can land in
    /// any order and converge on the same set.
    pub fn merge(&self, alert: Alert) -> bool {
        let id = alert.id.clone();
        let survived = {
            let mut map = self.by_id.write();
            if map.contains_key(&id) {
                return false;
            }
            map.insert(id.clone(), alert);

            let deduped = dedup_by_fingerprint(map.values().cloned().collect());
            let survived = deduped.iter().any(|a| a.id == id);
            *map = deduped.into_iter().map(|a| (a.id.clone(), a)).collect();
            survived
        };

        self.publish();
        survived
    }

    /// Remove an alert by id (a successful review resolves it out of the
    /// live triage queue). Returns the removed alert if it existed.
    pub fn remove(&self, id: &str) -> Option<Alert> {
        let removed = self.by_id.write().shift_remove(id);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<Alert> {
        self.by_id.read().get(id).cloned()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.read().contains_key(id)
    }

    /// Remove all alerts (session teardown).
    pub fn clear(&self) {
        self.by_id.write().clear();
        self.publish();
    }

    /// Current snapshot in arrival order (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Alert>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> AlertSetStream {
        AlertSetStream::new(self.snapshot.subscribe())
    }

    pub fn len(&self) -> usize {
        self.by_id.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.read().is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Rebuild the snapshot and bump the version.
    fn publish(&self) {
        let values: Vec<Alert> = self.by_id.read().values().cloned().collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertStatus, Severity};

    fn alert(id: &str, kind: &str, timestamp: &str, description: &str) -> Alert {
        Alert {
            id: id.into(),
            kind: kind.into(),
            timestamp: timestamp.into(),
            confidence: 80,
            severity: Severity::High,
            status: AlertStatus::Pending,
            description: description.into(),
            video_id: Some("vid1".into()),
            chunk_filename: None,
        }
    }

    #[test]
    fn replace_dedups_and_keeps_order() {
        let store = AlertStore::new();
        store.replace(vec![
            alert("1", "Fight Detected", "0:42", "fight near entrance"),
            alert("2", "Fight Detected", "0:42", "fight near entrance"),
            alert("3", "Loitering", "1:10", "person lingering"),
        ]);

        let snap = store.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].id, "1");
        assert_eq!(snap[1].id, "3");
    }

    #[test]
    fn merge_skips_existing_id() {
        let store = AlertStore::new();
        store.replace(vec![alert("1", "Fight Detected", "0:42", "fight")]);

        let updated = alert("1", "Fight Detected", "0:50", "different text");
        assert!(!store.merge(updated));
        assert_eq!(store.snapshot()[0].timestamp, "0:42");
    }

    #[test]
    fn merge_drops_fingerprint_duplicate_with_new_id() {
        let store = AlertStore::new();
        store.replace(vec![alert("1", "Fight Detected", "0:42", "fight near entrance")]);

        // Same detection re-announced under a new service id.
        assert!(!store.merge(alert("2", "Fight Detected", "0:42", "fight near entrance")));

        let snap = store.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, "1");
    }

    #[test]
    fn merge_is_commutative_across_arrival_order() {
        // No fingerprint collisions: both orders converge on the same ids.
        let bulk = vec![
            alert("1", "Fight Detected", "0:42", "fight near entrance"),
            alert("2", "Loitering", "1:10", "person lingering"),
        ];
        let pushes = vec![
            alert("3", "Fire Detected", "2:00", "smoke visible"),
            alert("4", "Intrusion", "3:05", "person at the back gate"),
        ];

        // Bulk first, then pushes.
        let store_a = AlertStore::new();
        store_a.replace(bulk.clone());
        for p in pushes.clone() {
            store_a.merge(p);
        }

        // Pushes first, then bulk merged alert-by-alert.
        let store_b = AlertStore::new();
        for p in pushes {
            store_b.merge(p);
        }
        for b in bulk {
            store_b.merge(b);
        }

        let mut ids_a: Vec<String> = store_a.snapshot().iter().map(|a| a.id.clone()).collect();
        let mut ids_b: Vec<String> = store_b.snapshot().iter().map(|a| a.id.clone()).collect();
        ids_a.sort();
        ids_b.sort();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn colliding_fingerprints_converge_regardless_of_arrival_order() {
        // Same detection under two service ids: the surviving id is
        // whichever arrived first, but both orders end with the same
        // fingerprint set and the same size.
        let first = alert("1", "Fight Detected", "0:42", "fight near entrance");
        let second = alert("4", "Fight Detected", "0:42", "fight near entrance");

        let store_a = AlertStore::new();
        store_a.merge(first.clone());
        store_a.merge(second.clone());

        let store_b = AlertStore::new();
        store_b.merge(second);
        store_b.merge(first);

        assert_eq!(store_a.len(), 1);
        assert_eq!(store_b.len(), 1);
        assert_eq!(store_a.snapshot()[0].id, "1");
        assert_eq!(store_b.snapshot()[0].id, "4");

        let fp_a: std::collections::HashSet<String> =
            store_a.snapshot().iter().map(Alert::fingerprint).collect();
        let fp_b: std::collections::HashSet<String> =
            store_b.snapshot().iter().map(Alert::fingerprint).collect();
        assert_eq!(fp_a, fp_b);
    }

    #[test]
    fn remove_resolves_out_of_the_set() {
        let store = AlertStore::new();
        store.replace(vec![
            alert("1", "Fight Detected", "0:42", "fight"),
            alert("2", "Loitering", "1:10", "lingering"),
        ]);

        let removed = store.remove("1");
        assert_eq!(removed.map(|a| a.id), Some("1".into()));
        assert!(!store.contains_id("1"));
        assert_eq!(store.len(), 1);
        assert!(store.remove("1").is_none());
    }

    #[tokio::test]
    async fn subscribers_see_mutations() {
        let store = AlertStore::new();
        let mut stream = store.subscribe();
        assert!(stream.current().is_empty());

        store.replace(vec![alert("1", "Fight Detected", "0:42", "fight")]);
        let snap = stream.changed().await.expect("store alive");
        assert_eq!(snap.len(), 1);

        store.clear();
        let snap = stream.changed().await.expect("store alive");
        assert!(snap.is_empty());
    }
}
