// ── Fingerprint deduplication ──

use std::collections::HashSet;

use crate::model::Alert;

/// Drop later duplicates (same fingerprint), preserving first-seen order.
///
/// The push stream and the bulk fetch can both deliver the same detection
/// under different service ids; the fingerprint collapses them. Idempotent
/// and O(n) per pass, so it is safe to re-run over the whole set on every
/// insertion.
///
/// Known limitation: two unrelated alerts sharing kind, timestamp, and
/// description text collapse to one. The fingerprint is a best-effort
/// identity surrogate, not a content hash.
pub fn dedup_by_fingerprint(alerts: Vec<Alert>) -> Vec<Alert> {
    let mut seen: HashSet<String> = HashSet::with_capacity(alerts.len());
    alerts
        .into_iter()
        .filter(|alert| seen.insert(alert.fingerprint()))
        .collect()
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
    fn drops_later_duplicates_keeps_first() {
        let input = vec![
            alert("1", "Fight Detected", "0:42", "fight near entrance"),
            alert("2", "Fight Detected", "0:42", "fight near entrance"),
            alert("3", "Loitering", "1:10", "person lingering"),
        ];

        let out = dedup_by_fingerprint(input);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "1");
        assert_eq!(out[1].id, "3");
    }

    #[test]
    fn preserves_order_when_no_duplicates() {
        let input = vec![
            alert("a", "Fire Detected", "0:10", "smoke visible"),
            alert("b", "Loitering", "0:20", "person lingering"),
            alert("c", "Fight Detected", "0:30", "scuffle"),
        ];

        let ids: Vec<String> = dedup_by_fingerprint(input).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn idempotent() {
        let input = vec![
            alert("1", "Fight Detected", "0:42", "fight near entrance"),
            alert("2", "fight detected", "0:42", "Fight Near Entrance"),
            alert("3", "Loitering", "1:10", "person lingering"),
            alert("4", "Loitering", "1:10", "person lingering"),
        ];

        let once = dedup_by_fingerprint(input);
        let twice = dedup_by_fingerprint(once.clone());
        assert_eq!(
            once.iter().map(|a| &a.id).collect::<Vec<_>>(),
            twice.iter().map(|a| &a.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(dedup_by_fingerprint(Vec::new()).is_empty());
    }
}
