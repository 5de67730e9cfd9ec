// ── Core error types ──
//
// User-facing errors from vigil-core. These are NOT API-specific --
// consumers never see raw HTTP plumbing directly. The
// `From<vigil_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the monitoring service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("No active monitoring session")]
    NoActiveSession,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by the service: {message}")]
    Rejected { message: String },

    #[error("Upload failed: {message}")]
    Upload { message: String },

    // ── Service errors (wrapped, not exposed raw) ────────────────────
    #[error("Service error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the failure is a missing entity (HTTP 404 or a local
    /// lookup miss).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Api { status: Some(404), .. }
        )
    }

    /// Whether the service rejected the request as a conflict (e.g.
    /// monitoring already running for the video).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. } | Self::Api { status: Some(409), .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vigil_api::Error> for CoreError {
    fn from(err: vigil_api::Error) -> Self {
        match err {
            vigil_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            vigil_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vigil_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            vigil_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vigil_api::Error::InvalidApiKey(msg) => CoreError::Config { message: msg },
            vigil_api::Error::Api {
                message,
                code,
                status,
            } => match status {
                404 => CoreError::NotFound {
                    entity: "Resource".into(),
                    identifier: message,
                },
                409 => CoreError::Rejected { message },
                _ => CoreError::Api {
                    message,
                    code,
                    status: Some(status),
                },
            },
            vigil_api::Error::StreamConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("Event stream failed: {reason}"),
            },
            vigil_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            vigil_api::Error::UploadSource { message } => CoreError::Upload { message },
        }
    }
}
