// Shared transport configuration for building reqwest::Client instances.
//
// REST calls and the SSE stream need different timeout shapes, so this
// module builds both client flavors from one config.

use std::path::PathBuf;
use std::time::Duration;

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed deployments).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Sent as `X-API-Key` on every request when set. Deployments behind
    /// an auth proxy use this; the open service ignores it.
    pub api_key: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` for REST calls.
    ///
    /// The configured timeout bounds the whole request, body included.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers()?)
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")));

        self.apply_tls(builder)?
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Build a `reqwest::Client` for the long-lived event stream.
    ///
    /// The configured timeout applies to connection establishment only;
    /// the response body is open-ended (the server holds it for the life
    /// of the subscription).
    pub fn build_stream_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let builder = reqwest::Client::builder()
            .connect_timeout(self.timeout)
            .default_headers(self.default_headers()?)
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")));

        self.apply_tls(builder)?
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build stream client: {e}")))
    }

    fn default_headers(&self) -> Result<reqwest::header::HeaderMap, crate::error::Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(ref key) = self.api_key {
            let mut value = reqwest::header::HeaderValue::from_str(key).map_err(|_| {
                crate::error::Error::InvalidApiKey(
                    "API key contains invalid header characters".into(),
                )
            })?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }
        Ok(headers)
    }

    fn apply_tls(
        &self,
        mut builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, crate::error::Error> {
        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    crate::error::Error::Tls(format!("failed to read CA cert: {e}"))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }
        Ok(builder)
    }
}
