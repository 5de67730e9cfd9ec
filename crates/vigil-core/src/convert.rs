// ── Wire-to-domain conversions ──
//
// Bridges raw `vigil_api` event documents into canonical `Alert` values.
// Normalizes the category code, footage offset, confidence, severity,
// and status per the display rules the operator console expects.

use vigil_api::models::RawEvent;

use crate::model::{Alert, AlertStatus, Severity};

// ── Helpers ────────────────────────────────────────────────────────

/// Title-case a snake_case category code: `fire_detected` → `Fire Detected`.
/// Missing or empty codes become the generic label `Event`.
fn title_case_kind(raw: Option<&str>) -> String {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return "Event".into();
    }

    raw.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Format a footage-relative offset in seconds as `M:SS`.
///
/// Fractional seconds are floored, negatives clamp to `0:00`, and the
/// seconds part is zero-padded to two digits.
fn format_offset(seconds: Option<f64>) -> String {
    let total = seconds.unwrap_or(0.0).max(0.0).floor();
    // Offsets are bounded by footage length; the cast cannot truncate in practice.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    let total = total as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Convert a raw probability 0.0–1.0 to an integer percent 0–100.
fn confidence_percent(probability: Option<f64>) -> u8 {
    let percent = (probability.unwrap_or(0.0) * 100.0).round().clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    let percent = percent as u8;
    percent
}

/// Resolve the severity: explicit detector severity wins, otherwise
/// derive from the raw probability.
fn resolve_severity(raw: &RawEvent) -> Severity {
    match raw.severity.as_deref().map(str::trim) {
        Some(explicit) if !explicit.is_empty() => Severity::from_wire(explicit),
        _ => Severity::from_confidence(raw.confidence.unwrap_or(0.0)),
    }
}

// ── RawEvent → Alert ───────────────────────────────────────────────

impl From<&RawEvent> for Alert {
    fn from(raw: &RawEvent) -> Self {
        let kind = title_case_kind(raw.event_type.as_deref());
        let timestamp = format_offset(raw.timestamp_start);
        let description = raw.event_description.clone().unwrap_or_default();

        // Stream deliveries occasionally lack any id; fall back to the
        // fingerprint fields so the alert still has a stable identity.
        let id = raw.event_id().map_or_else(
            || format!("{kind}|{timestamp}|{description}").to_lowercase(),
            str::to_owned,
        );

        Self {
            id,
            kind,
            timestamp,
            confidence: confidence_percent(raw.confidence),
            severity: resolve_severity(raw),
            status: AlertStatus::from_wire(raw.status.as_deref().unwrap_or("")),
            description,
            video_id: raw.video_id.clone(),
            chunk_filename: raw.chunk_filename.clone(),
        }
    }
}

// ── RawEvent → search row ──────────────────────────────────────────

/// One row of a footage search result, display-normalized.
///
/// Context summaries come back from the search endpoint with
/// `event_type: "Context"` and `status: "context"`; they carry no
/// review lifecycle.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchRow {
    pub kind: String,
    pub timestamp: String,
    pub confidence: u8,
    pub description: String,
    pub video_id: Option<String>,
    pub is_context: bool,
}

impl From<&RawEvent> for SearchRow {
    fn from(raw: &RawEvent) -> Self {
        let is_context = raw
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("context"));

        Self {
            kind: title_case_kind(raw.event_type.as_deref()),
            timestamp: format_offset(raw.timestamp_start),
            confidence: confidence_percent(raw.confidence),
            description: raw.event_description.clone().unwrap_or_default(),
            video_id: raw.video_id.clone(),
            is_context,
        }
    }
}
