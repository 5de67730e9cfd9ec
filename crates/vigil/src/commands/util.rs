//! Shared helpers for command handlers.

use std::io::IsTerminal;

use vigil_core::{Alert, AlertStatus, Severity, SeverityFilter, StatusFilter};

use crate::cli::{SeverityArg, StatusArg};
use crate::error::CliError;
use crate::output;

/// Map the optional `--severity` flag to a triage filter.
pub fn severity_filter(arg: Option<SeverityArg>) -> SeverityFilter {
    arg.map_or(SeverityFilter::All, |s| SeverityFilter::Only(severity(s)))
}

/// Map the optional `--status` flag to a triage filter.
pub fn status_filter(arg: Option<StatusArg>) -> StatusFilter {
    arg.map_or(StatusFilter::All, |s| StatusFilter::Only(status(s)))
}

pub fn severity(arg: SeverityArg) -> Severity {
    match arg {
        SeverityArg::Low => Severity::Low,
        SeverityArg::Med => Severity::Med,
        SeverityArg::High => Severity::High,
    }
}

pub fn status(arg: StatusArg) -> AlertStatus {
    match arg {
        StatusArg::Pending => AlertStatus::Pending,
        StatusArg::Confirmed => AlertStatus::Confirmed,
        StatusArg::Dismissed => AlertStatus::Dismissed,
    }
}

/// Wire form of a status filter for server-side queries.
pub fn status_wire(arg: StatusArg) -> &'static str {
    match arg {
        StatusArg::Pending => "pending",
        StatusArg::Confirmed => "confirmed",
        StatusArg::Dismissed => "dismissed",
    }
}

/// One-line rendering of an alert for live streaming output.
pub fn alert_line(alert: &Alert, color: bool) -> String {
    format!(
        "{:<4} {:>6}  {} ({}%) [{}] {}",
        output::severity_label(alert.severity, color),
        alert.timestamp,
        alert.kind,
        alert.confidence,
        alert.id,
        alert.description,
    )
}

/// Shorten long free-text cells for table display.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses rather than hangs when stdin is not a terminal.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.to_string(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
