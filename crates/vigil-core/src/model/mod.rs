// ── Domain types for the triage pipeline ──

mod alert;
mod filter;

pub use alert::{Alert, AlertStatus, Severity};
pub use filter::{SeverityFilter, StatusFilter};
