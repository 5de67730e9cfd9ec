// ── Runtime console configuration ──
//
// These types describe *how* to reach the monitoring service. They carry
// credential data and connection tuning, but never touch disk. The CLI
// constructs a `ConsoleConfig` from its profile layer and hands it in.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::triage::KeywordPolicy;

use vigil_api::transport::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict). Default; the service usually runs on
    /// plain HTTP or behind a proper certificate.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed deployments).
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults)
            | (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Configuration for one console instance.
///
/// Built by the CLI, passed to `Console` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Service root URL (e.g., `http://localhost:8000`).
    pub url: Url,
    /// Optional API key for deployments behind an auth proxy.
    pub api_key: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// Service-side cap for bulk event fetches.
    pub fetch_limit: u32,
    /// Keyword sets driving the priority comparator.
    pub keywords: KeywordPolicy,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:8000").expect("static URL"),
            api_key: None,
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
            fetch_limit: 50,
            keywords: KeywordPolicy::default(),
        }
    }
}

impl ConsoleConfig {
    /// Build the transport layer config for `vigil_api`.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_service() {
        let config = ConsoleConfig::default();
        assert_eq!(config.url.as_str(), "http://localhost:8000/");
        assert_eq!(config.fetch_limit, 50);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn transport_carries_the_api_key() {
        let config = ConsoleConfig {
            api_key: Some(SecretString::from("sekrit".to_string())),
            ..ConsoleConfig::default()
        };
        let transport = config.transport();
        assert_eq!(transport.api_key.as_deref(), Some("sekrit"));
    }
}
