// ── Alert domain types ──

use serde::{Deserialize, Serialize};

/// Alert severity as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Med,
    High,
}

impl Severity {
    /// Numeric rank for the priority comparator: HIGH=3, MED=2, LOW=1.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Med => 2,
            Self::Low => 1,
        }
    }

    /// Map an explicit detector severity string.
    ///
    /// `critical|high → HIGH`, `medium|med → MED`, anything else → LOW
    /// (case-insensitive).
    pub fn from_wire(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "critical" | "high" => Self::High,
            "medium" | "med" => Self::Med,
            _ => Self::Low,
        }
    }

    /// Derive a severity from the raw detection probability (0.0–1.0)
    /// when the detector supplies no explicit one.
    pub fn from_confidence(probability: f64) -> Self {
        if probability >= 0.8 {
            Self::High
        } else if probability >= 0.5 {
            Self::Med
        } else {
            Self::Low
        }
    }

    /// Wire form for review submissions.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Med => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::High => "HIGH",
            Self::Med => "MED",
            Self::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// Review lifecycle state. Created `Pending`; `Confirmed` and
/// `Dismissed` are terminal from the console's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    Pending,
    Confirmed,
    Dismissed,
}

impl AlertStatus {
    /// Map the service's status string; unknown or missing values are
    /// treated as still pending review.
    pub fn from_wire(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "dismissed" => Self::Dismissed,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Dismissed => "Dismissed",
        };
        f.write_str(label)
    }
}

/// One detected event awaiting (or having received) operator disposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Service-assigned id, or a locally derived one when absent.
    pub id: String,
    /// Human-readable category, title-cased from the raw code
    /// (`fire_detected` → `Fire Detected`).
    pub kind: String,
    /// Footage-relative offset formatted `M:SS`.
    pub timestamp: String,
    /// Detection confidence as an integer percent 0–100.
    pub confidence: u8,
    pub severity: Severity,
    pub status: AlertStatus,
    /// Free-text detector explanation.
    pub description: String,
    pub video_id: Option<String>,
    /// Playable clip reference; `None` means no clip is available.
    pub chunk_filename: Option<String>,
}

impl Alert {
    /// Near-duplicate identity key: lowercase `kind|timestamp|description`.
    ///
    /// The service does not guarantee idempotent delivery across the bulk
    /// fetch and the push stream, so this surrogate catches re-announced
    /// alerts. Unrelated alerts that happen to share all three fields
    /// collapse to one, an accepted approximation rather than an identity
    /// proof.
    pub fn fingerprint(&self) -> String {
        format!("{}|{}|{}", self.kind, self.timestamp, self.description).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(kind: &str, timestamp: &str, description: &str) -> Alert {
        Alert {
            id: "x".into(),
            kind: kind.into(),
            timestamp: timestamp.into(),
            confidence: 50,
            severity: Severity::Low,
            status: AlertStatus::Pending,
            description: description.into(),
            video_id: None,
            chunk_filename: None,
        }
    }

    #[test]
    fn severity_from_wire_strings() {
        assert_eq!(Severity::from_wire("critical"), Severity::High);
        assert_eq!(Severity::from_wire("HIGH"), Severity::High);
        assert_eq!(Severity::from_wire("medium"), Severity::Med);
        assert_eq!(Severity::from_wire("med"), Severity::Med);
        assert_eq!(Severity::from_wire("low"), Severity::Low);
        assert_eq!(Severity::from_wire("bogus"), Severity::Low);
    }

    #[test]
    fn severity_from_confidence_thresholds() {
        assert_eq!(Severity::from_confidence(0.95), Severity::High);
        assert_eq!(Severity::from_confidence(0.8), Severity::High);
        assert_eq!(Severity::from_confidence(0.79), Severity::Med);
        assert_eq!(Severity::from_confidence(0.5), Severity::Med);
        assert_eq!(Severity::from_confidence(0.49), Severity::Low);
    }

    #[test]
    fn status_from_wire_defaults_to_pending() {
        assert_eq!(AlertStatus::from_wire("confirmed"), AlertStatus::Confirmed);
        assert_eq!(AlertStatus::from_wire("dismissed"), AlertStatus::Dismissed);
        assert_eq!(AlertStatus::from_wire("pending"), AlertStatus::Pending);
        assert_eq!(AlertStatus::from_wire(""), AlertStatus::Pending);
        assert_eq!(AlertStatus::from_wire("context"), AlertStatus::Pending);
    }

    #[test]
    fn fingerprint_is_case_insensitive() {
        let a = alert("Fight Detected", "0:42", "Fight near entrance");
        let b = alert("fight detected", "0:42", "fight NEAR entrance");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_distinguishes_fields() {
        let a = alert("Fight Detected", "0:42", "near entrance");
        let b = alert("Fight Detected", "0:43", "near entrance");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
