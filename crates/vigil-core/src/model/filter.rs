// ── Filter predicates for the ranked alert view ──
//
// Applied before ranking; consumers pick severity/status subsets
// without re-fetching.

use super::{Alert, AlertStatus, Severity};

/// Severity filter for the triage view.
pub enum SeverityFilter {
    All,
    Only(Severity),
    Custom(Box<dyn Fn(&Alert) -> bool + Send + Sync>),
}

impl SeverityFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            Self::All => true,
            Self::Only(severity) => alert.severity == *severity,
            Self::Custom(f) => f(alert),
        }
    }
}

/// Review-status filter for the triage view.
pub enum StatusFilter {
    All,
    Only(AlertStatus),
    Custom(Box<dyn Fn(&Alert) -> bool + Send + Sync>),
}

impl StatusFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => alert.status == *status,
            Self::Custom(f) => f(alert),
        }
    }
}
