//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use vigil_config::ConfigError;
use vigil_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the monitoring service at {url}")]
    #[diagnostic(
        code(vigil::connection_failed),
        help(
            "Check that the service is running and accessible.\n\
             URL: {url}\n\
             Try: vigil health"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(vigil::timeout),
        help("Increase the timeout with --timeout or check service responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The service rejected the request as unauthorized")]
    #[diagnostic(
        code(vigil::auth_failed),
        help(
            "Verify the API key for the active profile.\n\
             Store one with: vigil config set api_key <key>"
        )
    )]
    AuthFailed,

    // ── Resources ────────────────────────────────────────────────────

    #[error("{entity} '{identifier}' not found")]
    #[diagnostic(code(vigil::not_found), help("Run: {hint}"))]
    NotFound {
        entity: String,
        identifier: String,
        hint: String,
    },

    #[error("Operation rejected: {message}")]
    #[diagnostic(code(vigil::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Service error ({code}): {message}")]
    #[diagnostic(code(vigil::api_error))]
    ApiError { code: String, message: String },

    #[error("Upload failed: {message}")]
    #[diagnostic(
        code(vigil::upload_failed),
        help("Check that the file exists and is a readable video.")
    )]
    Upload { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vigil::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vigil::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vigil config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(vigil::config), help("Run: vigil config show"))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(vigil::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(vigil::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NoActiveSession => Self::Validation {
                field: "session".into(),
                reason: "no active monitoring session".into(),
            },

            CoreError::NotFound { entity, identifier } => {
                let hint = match entity.as_str() {
                    "Alert" => "vigil alerts list".into(),
                    "Video" => "vigil monitor status".into(),
                    _ => "vigil health".into(),
                };
                Self::NotFound {
                    entity,
                    identifier,
                    hint,
                }
            }

            CoreError::Rejected { message } => Self::Conflict { message },

            CoreError::Upload { message } => Self::Upload { message },

            CoreError::Api {
                message,
                code,
                status,
            } => match status {
                Some(401 | 403) => Self::AuthFailed,
                Some(404) => Self::NotFound {
                    entity: "Resource".into(),
                    identifier: code.unwrap_or_default(),
                    hint: "vigil health".into(),
                },
                Some(409) => Self::Conflict { message },
                _ => Self::ApiError {
                    code: code.unwrap_or_else(|| "unknown".into()),
                    message,
                },
            },

            CoreError::Config { message } => Self::Config { message },

            CoreError::Internal(message) => Self::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },

            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound {
                name: profile,
                available: "(run `vigil config profiles`)".into(),
            },

            ConfigError::Io(err) => Self::Io(err),

            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
