// Monitoring service response types
//
// Models for the vigil service's JSON API. Fields use `#[serde(default)]`
// liberally because event documents vary by detector version and delivery
// path (bulk fetch serializes `_id` into `id`, the raw stream may not).

use serde::{Deserialize, Serialize};

// ── Events ───────────────────────────────────────────────────────────

/// One detected event as the service reports it.
///
/// Everything beyond the core set lands in `extra` so nothing the
/// detector sends is silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    /// Canonical id (bulk-fetch responses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Raw document id (stream deliveries may carry this instead).
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<String>,

    #[serde(default)]
    pub video_id: Option<String>,

    #[serde(default)]
    pub chunk_filename: Option<String>,

    /// Snake_case category code, e.g. `"fire_detected"`.
    #[serde(default)]
    pub event_type: Option<String>,

    #[serde(default)]
    pub event_description: Option<String>,

    /// Longer model rationale, when present.
    #[serde(default)]
    pub explanation: Option<String>,

    /// Detection probability, 0.0–1.0.
    #[serde(default)]
    pub confidence: Option<f64>,

    /// `"pending" | "confirmed" | "dismissed"` (also `"context"` for
    /// search summary rows).
    #[serde(default)]
    pub status: Option<String>,

    /// Detector severity, e.g. `"critical" | "high" | "medium" | "low"`.
    #[serde(default)]
    pub severity: Option<String>,

    /// Footage-relative offset in seconds.
    #[serde(default)]
    pub timestamp_start: Option<f64>,

    #[serde(default)]
    pub timestamp_end: Option<f64>,

    /// ISO timestamps from the service; kept verbatim.
    #[serde(default)]
    pub detected_at: Option<String>,

    #[serde(default)]
    pub reviewed_at: Option<String>,

    #[serde(default)]
    pub reviewer_notes: Option<String>,

    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawEvent {
    /// The event's id, preferring the canonical field over the raw one.
    pub fn event_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.raw_id.as_deref())
    }
}

/// Query parameters for `GET /api/events`.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub status: Option<String>,
    pub event_type: Option<String>,
    pub video_id: Option<String>,
    /// Service-side cap; the service defaults to 50 when omitted.
    pub limit: Option<u32>,
}

/// Terminal disposition for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDisposition {
    Confirmed,
    Dismissed,
}

/// Body for `POST /api/events/{id}/review`.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub status: ReviewDisposition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_notes: Option<String>,
}

// ── Search ───────────────────────────────────────────────────────────

/// Search mode: `monitor` surfaces detections first, `ask` favors
/// footage-context answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Monitor,
    Ask,
}

/// Body for `POST /api/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SearchMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Response from `POST /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Prose answer built by the service; opaque to the console.
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub results: Vec<RawEvent>,
}

// ── Analytics ────────────────────────────────────────────────────────

/// Query parameters for `GET /api/analytics`.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsQuery {
    pub from_date: Option<chrono::NaiveDate>,
    pub to_date: Option<chrono::NaiveDate>,
    pub video_id: Option<String>,
}

/// Response from `GET /api/analytics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub summary: AnalyticsSummary,
    #[serde(default, rename = "eventStats")]
    pub event_stats: Vec<EventTypeStat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default, rename = "totalEvents")]
    pub total_events: u64,
    #[serde(default)]
    pub confirmed: u64,
    #[serde(default)]
    pub dismissed: u64,
    /// Percent of reviewed events confirmed, rounded service-side.
    #[serde(default, rename = "aiAccuracy")]
    pub ai_accuracy: f64,
    /// Mean detection confidence as a rounded percent.
    #[serde(default, rename = "avgConfidence")]
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTypeStat {
    /// Title-cased event category.
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub confirmed: u64,
    #[serde(default)]
    pub accuracy: f64,
}

// ── Videos & processing ──────────────────────────────────────────────

/// Response from `GET /api/videos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetail {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
    /// `"uploaded" | "processing" | "completed" | ...` per the pipeline.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub chunk_count: Option<u64>,
    #[serde(default)]
    pub chunks_processed: Option<u64>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Response from `GET /api/videos/{id}/processing`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStatus {
    /// 0–100.
    #[serde(default)]
    pub progress: f64,
    #[serde(default, rename = "chunksAnalyzed")]
    pub chunks_analyzed: u64,
    #[serde(default, rename = "totalChunks")]
    pub total_chunks: u64,
    #[serde(default, rename = "failedChunks")]
    pub failed_chunks: u64,
}

// ── Monitoring control ───────────────────────────────────────────────

/// Body for `POST /api/start-monitoring`.
#[derive(Debug, Clone, Serialize)]
pub struct StartMonitoring {
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_duration_seconds: Option<u32>,
}

/// Acknowledgement from start/stop monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorReceipt {
    pub status: String,
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Response from `GET /api/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStatus {
    #[serde(default)]
    pub queue_size: u64,
    #[serde(default)]
    pub active_jobs: Vec<String>,
}

/// One monitoring preset from `GET /api/use-cases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseCase {
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Event categories this preset detects.
    #[serde(default)]
    pub events: Vec<String>,
    /// Prompt context handed to the detector.
    #[serde(default)]
    pub context: String,
}

/// Response from `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub video_id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub use_case: String,
    #[serde(default)]
    pub status: String,
}

/// Response from `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::unwrap_used)]
    #[test]
    fn raw_event_prefers_canonical_id() {
        let event: RawEvent = serde_json::from_str(
            r#"{"id":"abc","_id":"raw","event_type":"fire_detected"}"#,
        )
        .unwrap();
        assert_eq!(event.event_id(), Some("abc"));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn raw_event_falls_back_to_raw_id() {
        let event: RawEvent = serde_json::from_str(r#"{"_id":"raw"}"#).unwrap();
        assert_eq!(event.event_id(), Some("raw"));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn raw_event_captures_extra_fields() {
        let event: RawEvent = serde_json::from_str(
            r#"{"id":"1","event_type":"loitering","model_version":"v3"}"#,
        )
        .unwrap();
        assert_eq!(event.extra["model_version"], "v3");
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn review_request_omits_absent_fields() {
        let body = serde_json::to_value(ReviewRequest {
            status: ReviewDisposition::Confirmed,
            severity: None,
            reviewer_notes: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "confirmed"}));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn search_mode_serializes_lowercase() {
        let body = serde_json::to_value(SearchRequest {
            query: Some("fights".into()),
            mode: Some(SearchMode::Ask),
            ..SearchRequest::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"query": "fights", "mode": "ask"}));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn analytics_report_reads_camel_case() {
        let report: AnalyticsReport = serde_json::from_str(
            r#"{
                "summary": {
                    "totalEvents": 12, "confirmed": 4, "dismissed": 2,
                    "aiAccuracy": 67, "avgConfidence": 81
                },
                "eventStats": [
                    {"eventType": "Fire Detected", "count": 7, "confirmed": 3, "accuracy": 75}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(report.summary.total_events, 12);
        assert_eq!(report.event_stats.len(), 1);
        assert_eq!(report.event_stats[0].event_type, "Fire Detected");
    }
}
