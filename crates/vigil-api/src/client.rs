// Monitoring service HTTP client
//
// Wraps `reqwest::Client` with vigil-specific URL construction and error
// decoding. All endpoint modules (events, videos, search, etc.) are
// implemented as inherent methods via separate files to keep this module
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::sse::{AlertStreamHandle, ReconnectConfig};
use crate::transport::TransportConfig;
use tokio_util::sync::CancellationToken;

/// Raw HTTP client for the vigil monitoring service.
///
/// Non-2xx responses carry a `{"detail": ...}` body; this client decodes
/// that into [`Error::Api`] so callers never see the envelope. A second
/// `reqwest::Client` without a total timeout backs the SSE subscription.
pub struct ConsoleClient {
    http: reqwest::Client,
    stream_http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl ConsoleClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` should be the service root
    /// (e.g. `http://localhost:8000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let stream_http = transport.build_stream_client()?;
        Ok(Self {
            http,
            stream_http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// The underlying HTTP client (for callers that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Open the live alert subscription.
    ///
    /// Spawns the reconnecting SSE reader; see [`AlertStreamHandle`].
    pub async fn connect_alert_stream(
        &self,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
    ) -> Result<AlertStreamHandle, Error> {
        let url = self.api_url("events/stream");
        AlertStreamHandle::connect(url, self.stream_http.clone(), reconnect, cancel).await
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Url::parse(&full).expect("invalid API URL")
    }

    /// Build a full URL for a root-level path (e.g. `health`).
    pub(crate) fn root_url(&self, path: &str) -> Url {
        let full = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&full).expect("invalid root URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(self.map_send_err())?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(self.map_send_err())?;
        Self::parse_response(resp).await
    }

    /// Send a bodyless POST request and decode the response.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).send().await.map_err(self.map_send_err())?;
        Self::parse_response(resp).await
    }

    /// Send a multipart POST request and decode the response.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        debug!("POST {} (multipart)", url);

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(self.map_send_err())?;
        Self::parse_response(resp).await
    }

    /// Decode a response body, turning non-2xx statuses into [`Error::Api`].
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Fold reqwest timeouts into [`Error::Timeout`] with the configured
    /// budget; everything else stays a transport error.
    fn map_send_err(&self) -> impl Fn(reqwest::Error) -> Error {
        let timeout_secs = self.timeout_secs;
        move |e| {
            if e.is_timeout() {
                Error::Timeout { timeout_secs }
            } else {
                Error::Transport(e)
            }
        }
    }
}

/// Decode a non-2xx body into [`Error::Api`].
///
/// The service reports failures as `{"detail": "message"}`. Validation
/// errors can carry structured detail; those are passed through as JSON
/// text rather than dropped.
fn error_from_body(status: reqwest::StatusCode, body: &str) -> Error {
    #[derive(serde::Deserialize)]
    struct DetailBody {
        #[serde(default)]
        detail: serde_json::Value,
    }

    let message = serde_json::from_str::<DetailBody>(body)
        .ok()
        .and_then(|d| match d.detail {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Error::Api {
        message,
        code: None,
        status: status.as_u16(),
    }
}
