// ── Priority ranking ──
//
// Orders alerts for operator attention with a tiered comparator:
// keyword score, then severity rank, then confidence, then timestamp.
// Filtering happens before ranking so "nothing matches the filters"
// stays distinguishable from "nothing detected at all".

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Alert, SeverityFilter, StatusFilter};

/// Keyword sets driving the top comparator tier.
///
/// Any human-involvement keyword in the alert text scores 3, any hazard
/// keyword scores 2, a bare `unsafe`/`fight` mention scores 1. Configurable
/// so deployments can tune the policy without touching the comparator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPolicy {
    pub human: Vec<String>,
    pub hazard: Vec<String>,
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        let human = [
            "child",
            "kid",
            "infant",
            "toddler",
            "person",
            "pedestrian",
            "human",
            "man",
            "woman",
            "people",
            "student",
            "elderly",
            "injured",
            "unconscious",
        ];
        let hazard = [
            "medical",
            "emergency",
            "assault",
            "weapon",
            "fire",
            "smoke",
            "collision",
            "crash",
            "hit",
            "injury",
            "gun",
            "knife",
        ];

        Self {
            human: human.iter().map(ToString::to_string).collect(),
            hazard: hazard.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Score an alert's combined kind + description text against the policy.
pub fn keyword_score(alert: &Alert, policy: &KeywordPolicy) -> u8 {
    let text = format!("{} {}", alert.kind, alert.description).to_lowercase();

    if policy.human.iter().any(|word| text.contains(word.as_str())) {
        3
    } else if policy.hazard.iter().any(|word| text.contains(word.as_str())) {
        2
    } else if text.contains("unsafe") || text.contains("fight") {
        1
    } else {
        0
    }
}

/// The ranked triage view, with the empty cases kept distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum TriageView {
    /// No alerts exist at all.
    Empty,
    /// Alerts exist, but none pass the active filters.
    NoMatches { total: usize },
    /// Filtered alerts in priority order, highest attention first.
    Ranked(Vec<Alert>),
}

impl TriageView {
    /// The ranked alerts, or an empty slice for either empty case.
    pub fn alerts(&self) -> &[Alert] {
        match self {
            Self::Ranked(alerts) => alerts,
            Self::Empty | Self::NoMatches { .. } => &[],
        }
    }
}

/// Filter then rank a set of alerts for display.
///
/// The comparator is total and deterministic: ties on every tier fall
/// through to the lexicographically larger timestamp (most recent footage
/// offset first), so repeated calls return the same order.
pub fn rank(
    alerts: &[Alert],
    severity: &SeverityFilter,
    status: &StatusFilter,
    policy: &KeywordPolicy,
) -> TriageView {
    if alerts.is_empty() {
        return TriageView::Empty;
    }

    let mut filtered: Vec<Alert> = alerts
        .iter()
        .filter(|a| severity.matches(a) && status.matches(a))
        .cloned()
        .collect();

    if filtered.is_empty() {
        return TriageView::NoMatches {
            total: alerts.len(),
        };
    }

    filtered.sort_by(|a, b| compare(a, b, policy));
    TriageView::Ranked(filtered)
}

/// Tiered comparator; `Less` means "ranks earlier" (higher attention).
fn compare(a: &Alert, b: &Alert, policy: &KeywordPolicy) -> Ordering {
    keyword_score(b, policy)
        .cmp(&keyword_score(a, policy))
        .then_with(|| b.severity.rank().cmp(&a.severity.rank()))
        .then_with(|| b.confidence.cmp(&a.confidence))
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertStatus, Severity};

    fn alert(id: &str, description: &str, confidence: u8, severity: Severity) -> Alert {
        Alert {
            id: id.into(),
            kind: "Motion".into(),
            timestamp: "0:30".into(),
            confidence,
            severity,
            status: AlertStatus::Pending,
            description: description.into(),
            video_id: None,
            chunk_filename: None,
        }
    }

    fn ids(view: &TriageView) -> Vec<&str> {
        view.alerts().iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn human_keywords_dominate_confidence_and_severity() {
        // B: low confidence but mentions a child; A: high confidence, no keywords.
        let a = alert("a", "vehicle idling", 90, Severity::Low);
        let b = alert("b", "child near the road", 40, Severity::Low);

        let view = rank(
            &[a, b],
            &SeverityFilter::All,
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(ids(&view), ["b", "a"]);
    }

    #[test]
    fn hazard_scores_below_human() {
        let human = alert("h", "pedestrian crossing", 10, Severity::Low);
        let hazard = alert("z", "smoke rising from bin", 99, Severity::High);
        let generic = alert("g", "fight breaking out", 99, Severity::High);

        let view = rank(
            &[generic.clone(), hazard.clone(), human.clone()],
            &SeverityFilter::All,
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(ids(&view), ["h", "z", "g"]);
    }

    #[test]
    fn severity_breaks_keyword_ties() {
        let low = alert("l", "nothing notable", 80, Severity::Low);
        let high = alert("h", "nothing notable", 20, Severity::High);

        let view = rank(
            &[low, high],
            &SeverityFilter::All,
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(ids(&view), ["h", "l"]);
    }

    #[test]
    fn confidence_breaks_severity_ties() {
        let weak = alert("w", "nothing notable", 40, Severity::Med);
        let strong = alert("s", "nothing notable", 75, Severity::Med);

        let view = rank(
            &[weak, strong],
            &SeverityFilter::All,
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(ids(&view), ["s", "w"]);
    }

    #[test]
    fn timestamp_is_the_final_tiebreak() {
        let mut early = alert("e", "nothing notable", 50, Severity::Med);
        early.timestamp = "0:10".into();
        let mut late = alert("l", "nothing notable", 50, Severity::Med);
        late.timestamp = "0:55".into();

        let view = rank(
            &[early, late],
            &SeverityFilter::All,
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(ids(&view), ["l", "e"]);
    }

    #[test]
    fn ranking_is_deterministic_across_calls() {
        let alerts = vec![
            alert("1", "fire near exit", 70, Severity::High),
            alert("2", "person down", 70, Severity::High),
            alert("3", "nothing notable", 70, Severity::High),
        ];

        let first = rank(
            &alerts,
            &SeverityFilter::All,
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        for _ in 0..5 {
            let again = rank(
                &alerts,
                &SeverityFilter::All,
                &StatusFilter::All,
                &KeywordPolicy::default(),
            );
            assert_eq!(ids(&first), ids(&again));
        }
    }

    #[test]
    fn filters_apply_before_ranking() {
        let mut confirmed = alert("c", "nothing notable", 90, Severity::High);
        confirmed.status = AlertStatus::Confirmed;
        let pending = alert("p", "nothing notable", 10, Severity::Low);

        let view = rank(
            &[confirmed, pending],
            &SeverityFilter::All,
            &StatusFilter::Only(AlertStatus::Pending),
            &KeywordPolicy::default(),
        );
        assert_eq!(ids(&view), ["p"]);
    }

    #[test]
    fn empty_source_and_no_matches_are_distinct() {
        let view = rank(
            &[],
            &SeverityFilter::All,
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(view, TriageView::Empty);

        let alerts = [alert("1", "nothing notable", 50, Severity::Low)];
        let view = rank(
            &alerts,
            &SeverityFilter::Only(Severity::High),
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(view, TriageView::NoMatches { total: 1 });
    }

    #[test]
    fn severity_filter_membership() {
        let alerts = vec![
            alert("h", "x", 50, Severity::High),
            alert("m", "x", 50, Severity::Med),
            alert("l", "x", 50, Severity::Low),
        ];

        let view = rank(
            &alerts,
            &SeverityFilter::Only(Severity::Med),
            &StatusFilter::All,
            &KeywordPolicy::default(),
        );
        assert_eq!(ids(&view), ["m"]);
    }
}
