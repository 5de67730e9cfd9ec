//! SSE alert stream with auto-reconnect.
//!
//! Connects to the monitoring service's `/api/events/stream` endpoint and
//! streams parsed alert events through a [`tokio::sync::broadcast`]
//! channel. Handles reconnection with exponential backoff + jitter
//! automatically.
//!
//! # Example
//!
//! ```rust,ignore
//! use vigil_api::sse::{AlertStreamHandle, ReconnectConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let handle = client.connect_alert_stream(ReconnectConfig::default(), cancel.clone()).await?;
//! let mut rx = handle.subscribe();
//!
//! while let Ok(event) = rx.recv().await {
//!     println!("{}: {}", event.event_type.as_deref().unwrap_or("?"),
//!              event.event_description.as_deref().unwrap_or(""));
//! }
//!
//! handle.shutdown();
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::models::RawEvent;

// ── Broadcast channel capacity ───────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Event name the service uses for alert frames; everything else on the
/// stream is keepalive or diagnostic.
const ALERT_EVENT: &str = "alert";

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Exponential backoff configuration for stream reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

// ── AlertStreamHandle ────────────────────────────────────────────────

/// Handle to a running alert stream.
///
/// Cheaply cloneable via the inner broadcast sender. Drop all handles
/// and call [`shutdown`](Self::shutdown) to tear down the background task.
pub struct AlertStreamHandle {
    event_rx: broadcast::Receiver<Arc<RawEvent>>,
    cancel: CancellationToken,
}

impl AlertStreamHandle {
    /// Connect to the alert stream and spawn the reconnection loop.
    ///
    /// Returns immediately once the background task is spawned.
    /// The first connection attempt happens asynchronously -- subscribe to
    /// the event receiver to start consuming events.
    pub async fn connect(
        stream_url: Url,
        http: reqwest::Client,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
    ) -> Result<Self, Error> {
        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            sse_loop(stream_url, http, event_tx, reconnect, task_cancel).await;
        });

        Ok(Self { event_rx, cancel })
    }

    /// Get a new broadcast receiver for the event stream.
    ///
    /// Multiple consumers can subscribe concurrently. If a consumer falls
    /// behind, it receives [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<RawEvent>> {
        self.event_rx.resubscribe()
    }

    /// The alert stream as a `futures` stream.
    ///
    /// Lagged gaps are logged and skipped; the stream ends when the
    /// background task shuts down.
    pub fn events(&self) -> impl futures_util::Stream<Item = Arc<RawEvent>> + Send + use<> {
        let mut rx = self.event_rx.resubscribe();
        async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "alert stream consumer lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    /// Signal the background task to shut down gracefully.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// Main loop: connect → read → on error, backoff → reconnect.
async fn sse_loop(
    stream_url: Url,
    http: reqwest::Client,
    event_tx: broadcast::Sender<Arc<RawEvent>>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = connect_and_read(&stream_url, &http, &event_tx, &cancel) => {
                match result {
                    // Clean disconnect (server closed the response body).
                    // Reset attempt counter and reconnect immediately.
                    Ok(()) => {
                        tracing::info!("Event stream disconnected cleanly, reconnecting");
                        attempt = 0;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, attempt, "Event stream error");

                        if let Some(max) = reconnect.max_retries {
                            if attempt >= max {
                                tracing::error!(
                                    max_retries = max,
                                    "Event stream reconnection limit reached, giving up"
                                );
                                break;
                            }
                        }

                        let delay = calculate_backoff(attempt, &reconnect);
                        tracing::info!(
                            delay_ms = delay.as_millis() as u64,
                            attempt,
                            "Waiting before reconnect"
                        );

                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }

                        attempt += 1;
                    }
                }
            }
        }
    }

    // Note: tracing after the loop is technically reachable (via break)
    // but the compiler's macro expansion for select! can't prove it.
    #[allow(unreachable_code)]
    { tracing::debug!("Event stream loop exiting"); }
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish one SSE connection, read frames until it drops.
async fn connect_and_read(
    url: &Url,
    http: &reqwest::Client,
    event_tx: &broadcast::Sender<Arc<RawEvent>>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "Connecting to event stream");

    let resp = http
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|e| Error::StreamConnect(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::StreamConnect(format!(
            "event stream returned HTTP {status}"
        )));
    }

    tracing::info!("Event stream connected");

    let mut body = resp.bytes_stream();
    let mut parser = SseParser::default();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            chunk = body.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        for message in parser.feed(&bytes) {
                            publish_message(&message, event_tx);
                        }
                    }
                    Some(Err(e)) => {
                        return Err(Error::StreamConnect(e.to_string()));
                    }
                    None => {
                        // Server closed the stream without an error
                        tracing::info!("Event stream ended");
                        return Ok(());
                    }
                }
            }
        }
    }
}

// ── Frame handling ───────────────────────────────────────────────────

/// One decoded SSE message.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SseMessage {
    /// Event name; `"message"` when the frame carries no `event:` field.
    event: String,
    data: String,
}

/// Parse an alert frame and broadcast it.
///
/// Frames with other event names are keepalives or diagnostics; malformed
/// alert payloads are logged and skipped so one bad event never breaks
/// the stream.
fn publish_message(message: &SseMessage, event_tx: &broadcast::Sender<Arc<RawEvent>>) {
    if message.event != ALERT_EVENT {
        tracing::trace!(event = %message.event, "Ignoring non-alert frame");
        return;
    }

    match serde_json::from_str::<RawEvent>(&message.data) {
        Ok(event) => {
            // Ignore send errors -- just means no active subscribers right now
            let _ = event_tx.send(Arc::new(event));
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse alert frame");
        }
    }
}

// ── SSE wire parser ──────────────────────────────────────────────────

/// Incremental parser for the `text/event-stream` wire format.
///
/// Handles frames split across arbitrary chunk boundaries, CRLF line
/// endings, comment keepalives (`: ping`), and multi-line `data:` fields.
/// `id:` and `retry:` fields are accepted and ignored.
#[derive(Debug, Default)]
struct SseParser {
    buf: BytesMut,
    event: Option<String>,
    data: String,
}

impl SseParser {
    /// Consume a chunk, returning every message completed by it.
    fn feed(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line = self.buf.split_to(pos + 1);
            let line = &line[..line.len() - 1];
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            match std::str::from_utf8(line) {
                Ok(text) => self.handle_line(text, &mut out),
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping non-UTF-8 stream line");
                }
            }
        }
        out
    }

    fn handle_line(&mut self, line: &str, out: &mut Vec<SseMessage>) {
        if line.is_empty() {
            // Blank line dispatches the accumulated frame, if any.
            if !self.data.is_empty() {
                out.push(SseMessage {
                    event: self
                        .event
                        .take()
                        .unwrap_or_else(|| "message".to_string()),
                    data: std::mem::take(&mut self.data),
                });
            } else {
                self.event = None;
            }
            return;
        }

        if line.starts_with(':') {
            // Comment line -- the service uses these as keepalive pings.
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if !self.data.is_empty() {
                    self.data.push('\n');
                }
                self.data.push_str(value);
            }
            _ => {}
        }
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) + jitter`
///
/// Jitter is +-25% to spread out reconnection storms from multiple clients.
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let base = config
        .initial_delay
        .as_secs_f64()
        * 2.0_f64.powi(attempt as i32);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Deterministic "jitter" seeded from the attempt number.
    // Not cryptographically random, but good enough for backoff spread.
    let jitter_factor = 1.0 + 0.25 * ((attempt as f64 * 7.3).sin());
    let with_jitter = (capped * jitter_factor).max(0.0);

    Duration::from_secs_f64(with_jitter)
}

// ── Tests ────────────────────────────────────────────────────────────
