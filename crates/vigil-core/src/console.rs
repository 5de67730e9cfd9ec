// ── Console abstraction ──
//
// Full lifecycle management for one monitoring session: bulk fetch on
// activation, live push-event merging with a session-identity guard,
// review mutations with resolve-and-remove semantics, and reactive
// alert streaming through the AlertStore.

use std::sync::Arc;

use parking_lot::Mutex as SyncMutex;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use indexmap::IndexSet;

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{Alert, Severity, SeverityFilter, StatusFilter};
use crate::session::{AskCacheEntry, ConsoleSession, SessionStore};
use crate::store::AlertStore;
use crate::stream::AlertSetStream;
use crate::triage::{TriageView, dedup_by_fingerprint, rank};

use vigil_api::ConsoleClient;
use vigil_api::models::{
    AnalyticsQuery, AnalyticsReport, EventQuery, Health, MonitorReceipt, PipelineStatus, RawEvent,
    ReviewDisposition, ReviewRequest, SearchRequest, SearchResponse, StartMonitoring,
    UploadReceipt, UseCase, VideoDetail,
};
use vigil_api::sse::{AlertStreamHandle, ReconnectConfig};

const MERGED_CHANNEL_SIZE: usize = 256;

/// Resolved ids and fingerprints remembered per session. Old entries are
/// evicted first when the cap is hit.
const TOMBSTONE_CAP: usize = 512;

// ── SessionState ─────────────────────────────────────────────────────

/// Monitoring-session state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session; the alert set is empty and not loading.
    Inactive,
    /// Bulk fetch and stream setup in progress.
    Activating { video_id: String },
    /// Bulk fetch done, push subscription running.
    Live { video_id: String },
    /// Activation failed; the alert set is empty.
    Failed,
}

// ── Review input ─────────────────────────────────────────────────────

/// Operator verdict for a detailed review.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// `true` maps to `Confirmed`, `false` to `Dismissed`.
    pub was_correct: bool,
    pub severity: Option<Severity>,
    pub notes: Option<String>,
}

/// A footage search result, display-ready.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Prose answer built by the service; opaque to the console.
    pub answer: String,
    pub rows: Vec<crate::convert::SearchRow>,
}

// ── Tombstones ───────────────────────────────────────────────────────

/// Short-lived memory of resolved alerts.
///
/// A push re-announcement of a just-reviewed alert would reintroduce it
/// during the service's eventual-consistency window; the merge guard
/// drops events whose id or fingerprint appears here. Session-scoped:
/// cleared on activation and teardown.
#[derive(Debug, Default)]
pub(crate) struct Tombstones {
    entries: IndexSet<String>,
}

impl Tombstones {
    pub(crate) fn insert(&mut self, key: String) {
        if self.entries.insert(key) && self.entries.len() > TOMBSTONE_CAP {
            self.entries.shift_remove_index(0);
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ── Console ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Owns the authoritative
/// alert set for at most one monitoring session at a time and exposes
/// the rest of the service surface (search, analytics, videos,
/// monitoring control) as typed async operations.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    client: ConsoleClient,
    store: Arc<AlertStore>,
    session: ConsoleSession,
    state: watch::Sender<SessionState>,
    merged_tx: broadcast::Sender<Arc<Alert>>,
    tombstones: Arc<SyncMutex<Tombstones>>,
    active: Mutex<Option<ActiveSession>>,
}

struct ActiveSession {
    video_id: String,
    stream: AlertStreamHandle,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Console {
    /// Create a new Console with an in-memory session store. Does NOT
    /// touch the network -- call [`activate()`](Self::activate) to start
    /// a monitoring session, or use the one-shot operations directly.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        Self::with_session_store(config, Arc::new(crate::session::MemorySessionStore::new()))
    }

    /// Create a Console over an injected [`SessionStore`] backend.
    pub fn with_session_store(
        config: ConsoleConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, CoreError> {
        let client = ConsoleClient::new(config.url.clone(), &config.transport())?;
        let (state, _) = watch::channel(SessionState::Inactive);
        let (merged_tx, _) = broadcast::channel(MERGED_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                client,
                store: Arc::new(AlertStore::new()),
                session: ConsoleSession::new(store),
                state,
                merged_tx,
                tombstones: Arc::new(SyncMutex::new(Tombstones::default())),
                active: Mutex::new(None),
            }),
        })
    }

    /// Access the console configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// Access the underlying AlertStore.
    pub fn store(&self) -> &Arc<AlertStore> {
        &self.inner.store
    }

    /// Access the typed session-store view.
    pub fn session(&self) -> &ConsoleSession {
        &self.inner.session
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Activate a monitoring session for one video.
    ///
    /// Tears down any existing session first, then: bulk fetch → dedup →
    /// replace the set → open the push subscription → spawn the merge
    /// loop. On bulk-fetch failure the set stays empty and the error is
    /// surfaced; no stale data is shown.
    pub async fn activate(&self, video_id: &str) -> Result<(), CoreError> {
        self.deactivate().await;

        let _ = self.inner.state.send(SessionState::Activating {
            video_id: video_id.to_string(),
        });

        let alerts = match self.fetch_session_alerts(video_id).await {
            Ok(alerts) => alerts,
            Err(e) => {
                let _ = self.inner.state.send(SessionState::Failed);
                return Err(e);
            }
        };
        self.inner.store.replace(alerts);

        let cancel = CancellationToken::new();
        let stream = match self
            .inner
            .client
            .connect_alert_stream(ReconnectConfig::default(), cancel.clone())
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                self.inner.store.clear();
                let _ = self.inner.state.send(SessionState::Failed);
                return Err(e.into());
            }
        };

        let task = tokio::spawn(merge_loop(
            self.inner.store.clone(),
            self.inner.tombstones.clone(),
            self.inner.merged_tx.clone(),
            video_id.to_string(),
            stream.subscribe(),
            cancel.clone(),
        ));

        *self.inner.active.lock().await = Some(ActiveSession {
            video_id: video_id.to_string(),
            stream,
            cancel,
            task,
        });

        self.inner.session.set_last_video_id(video_id);
        self.inner.session.mark_authenticated();
        let _ = self.inner.state.send(SessionState::Live {
            video_id: video_id.to_string(),
        });
        info!(video_id, alerts = self.inner.store.len(), "monitoring session live");
        Ok(())
    }

    /// Tear down the active session, if any.
    ///
    /// Cancels the merge loop before clearing state, so a late event from
    /// the superseded session can never mutate the next session's set.
    pub async fn deactivate(&self) {
        let mut active = self.inner.active.lock().await;
        if let Some(session) = active.take() {
            session.cancel.cancel();
            session.stream.shutdown();
            if let Err(e) = session.task.await {
                warn!(error = %e, "merge loop join failed");
            }
            debug!(video_id = %session.video_id, "session deactivated");
        }
        drop(active);

        self.inner.tombstones.lock().clear();
        self.inner.store.clear();
        let _ = self.inner.state.send(SessionState::Inactive);
    }

    /// Re-run the bulk fetch for the active session.
    ///
    /// On failure the current set is left as-is (unlike activation, where
    /// there is nothing worth keeping).
    pub async fn reload(&self) -> Result<(), CoreError> {
        let video_id = {
            let active = self.inner.active.lock().await;
            active
                .as_ref()
                .map(|s| s.video_id.clone())
                .ok_or(CoreError::NoActiveSession)?
        };

        let alerts = self.fetch_session_alerts(&video_id).await?;
        self.inner.store.replace(alerts);
        debug!(video_id, alerts = self.inner.store.len(), "session reloaded");
        Ok(())
    }

    /// The active session's video id, if a session is live.
    pub async fn active_video_id(&self) -> Option<String> {
        self.inner.active.lock().await.as_ref().map(|s| s.video_id.clone())
    }

    async fn fetch_session_alerts(&self, video_id: &str) -> Result<Vec<Alert>, CoreError> {
        let query = EventQuery {
            video_id: Some(video_id.to_string()),
            limit: Some(self.inner.config.fetch_limit),
            ..EventQuery::default()
        };
        let events = self.inner.client.list_events(&query).await?;
        Ok(events.iter().map(Alert::from).collect())
    }

    // ── Review lifecycle ─────────────────────────────────────────────

    /// Confirm an alert as a true detection.
    pub async fn confirm(&self, id: &str) -> Result<Alert, CoreError> {
        self.review(id, ReviewDisposition::Confirmed, None, None).await
    }

    /// Dismiss an alert as a false positive.
    pub async fn dismiss(&self, id: &str) -> Result<Alert, CoreError> {
        self.review(id, ReviewDisposition::Dismissed, None, None).await
    }

    /// Submit a detailed review verdict.
    pub async fn submit_review(&self, id: &str, outcome: &ReviewOutcome) -> Result<Alert, CoreError> {
        let disposition = if outcome.was_correct {
            ReviewDisposition::Confirmed
        } else {
            ReviewDisposition::Dismissed
        };
        self.review(id, disposition, outcome.severity, outcome.notes.clone())
            .await
    }

    /// Shared review path: remote status-set, then resolve-and-remove.
    ///
    /// On failure local state is untouched and the error is surfaced;
    /// retry is an explicit operator action (the remote call is a
    /// status-set, so retrying is idempotent).
    async fn review(
        &self,
        id: &str,
        disposition: ReviewDisposition,
        severity: Option<Severity>,
        notes: Option<String>,
    ) -> Result<Alert, CoreError> {
        let request = ReviewRequest {
            status: disposition,
            severity: severity.map(|s| s.as_wire().to_string()),
            reviewer_notes: notes,
        };

        let updated = self
            .inner
            .client
            .review_event(id, &request)
            .await
            .map_err(CoreError::from)
            .map_err(|e| not_found_as("Alert", id, e))?;

        let resolved = Alert::from(&updated);
        {
            let mut tombs = self.inner.tombstones.lock();
            tombs.insert(id.to_string());
            tombs.insert(resolved.fingerprint());
        }

        // The locally held copy may differ from the service's echo;
        // tombstone its fingerprint too.
        if let Some(local) = self.inner.store.remove(id) {
            self.inner.tombstones.lock().insert(local.fingerprint());
            debug!(id, ?disposition, "alert resolved out of the live set");
        }

        Ok(resolved)
    }

    // ── Triage reads ─────────────────────────────────────────────────

    /// Rank the live alert set for display.
    pub fn triage_view(&self, severity: &SeverityFilter, status: &StatusFilter) -> TriageView {
        rank(
            &self.inner.store.snapshot(),
            severity,
            status,
            &self.inner.config.keywords,
        )
    }

    /// One-shot fetch + dedup + rank, independent of any live session.
    pub async fn fetch_ranked(
        &self,
        query: &EventQuery,
        severity: &SeverityFilter,
        status: &StatusFilter,
    ) -> Result<TriageView, CoreError> {
        let events = self.inner.client.list_events(query).await?;
        let alerts = dedup_by_fingerprint(events.iter().map(Alert::from).collect());
        Ok(rank(&alerts, severity, status, &self.inner.config.keywords))
    }

    // ── Footage search ───────────────────────────────────────────────

    /// Search detected events and footage context.
    ///
    /// Successful "ask" queries scoped to a video are cached in the
    /// session store and restored on the next activation of that video.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, CoreError> {
        let response: SearchResponse = self.inner.client.search(request).await?;
        let rows: Vec<crate::convert::SearchRow> =
            response.results.iter().map(Into::into).collect();

        if request.mode == Some(vigil_api::models::SearchMode::Ask) {
            if let (Some(video_id), Some(query)) =
                (request.video_id.as_deref(), request.query.as_deref())
            {
                self.inner.session.store_ask_cache(
                    video_id,
                    &AskCacheEntry {
                        query: query.to_string(),
                        answer: response.answer.clone(),
                        results: rows.clone(),
                    },
                );
            }
        }

        Ok(SearchOutcome {
            answer: response.answer,
            rows,
        })
    }

    /// The cached Q&A answer for a video, if one survives from an
    /// earlier session.
    pub fn cached_ask(&self, video_id: &str) -> Option<AskCacheEntry> {
        self.inner.session.ask_cache(video_id)
    }

    // ── Service surface passthroughs ─────────────────────────────────

    pub async fn analytics(&self, query: &AnalyticsQuery) -> Result<AnalyticsReport, CoreError> {
        Ok(self.inner.client.analytics(query).await?)
    }

    pub async fn video(&self, id: &str) -> Result<VideoDetail, CoreError> {
        self.inner
            .client
            .video(id)
            .await
            .map_err(CoreError::from)
            .map_err(|e| not_found_as("Video", id, e))
    }

    pub async fn processing(&self, id: &str) -> Result<vigil_api::models::ProcessingStatus, CoreError> {
        self.inner
            .client
            .processing(id)
            .await
            .map_err(CoreError::from)
            .map_err(|e| not_found_as("Video", id, e))
    }

    /// Upload a video and remember it as the most recent session id.
    pub async fn upload(&self, path: &std::path::Path, use_case: &str) -> Result<UploadReceipt, CoreError> {
        let receipt = self.inner.client.upload_video(path, use_case).await?;
        self.inner.session.set_last_video_id(&receipt.video_id);
        Ok(receipt)
    }

    pub async fn start_monitoring(&self, request: &StartMonitoring) -> Result<MonitorReceipt, CoreError> {
        let video_id = request.video_id.clone();
        self.inner
            .client
            .start_monitoring(request)
            .await
            .map_err(CoreError::from)
            .map_err(|e| not_found_as("Video", &video_id, e))
    }

    pub async fn stop_monitoring(&self, video_id: &str) -> Result<MonitorReceipt, CoreError> {
        Ok(self.inner.client.stop_monitoring(video_id).await?)
    }

    pub async fn pipeline_status(&self) -> Result<PipelineStatus, CoreError> {
        Ok(self.inner.client.pipeline_status().await?)
    }

    pub async fn use_cases(&self) -> Result<Vec<UseCase>, CoreError> {
        Ok(self.inner.client.use_cases().await?)
    }

    pub async fn health(&self) -> Result<Health, CoreError> {
        let health = self.inner.client.health().await?;
        self.inner.session.mark_authenticated();
        Ok(health)
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// One-shot: build a console, run the closure, tear down.
    ///
    /// Optimized for CLI commands that need a single request-response
    /// cycle; any session the closure activated is deactivated on exit.
    pub async fn oneshot<F, Fut, T>(config: ConsoleConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Console) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let console = Console::new(config)?;
        let result = f(console.clone()).await;
        console.deactivate().await;
        result
    }

    // ── State observation ────────────────────────────────────────────

    /// Subscribe to session state changes.
    pub fn session_state(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to alerts as they survive the merge (for live views).
    pub fn merged_alerts(&self) -> broadcast::Receiver<Arc<Alert>> {
        self.inner.merged_tx.subscribe()
    }

    /// Current alert snapshot in arrival order.
    pub fn snapshot(&self) -> Arc<Vec<Alert>> {
        self.inner.store.snapshot()
    }

    /// Subscribe to alert-set changes.
    pub fn alerts(&self) -> AlertSetStream {
        self.inner.store.subscribe()
    }
}

// ── Merge guard ──────────────────────────────────────────────────────

/// Decide whether a push-delivered event may enter the set.
///
/// Discards events scoped to another session and events whose id or
/// fingerprint is tombstoned; everything else converts to an [`Alert`]
/// for the merge.
pub(crate) fn admit_event(
    raw: &RawEvent,
    video_id: &str,
    tombstones: &Tombstones,
) -> Option<Alert> {
    if raw.video_id.as_deref() != Some(video_id) {
        debug!(
            event_video = raw.video_id.as_deref().unwrap_or("<none>"),
            session = video_id,
            "discarding event from another session"
        );
        return None;
    }

    let alert = Alert::from(raw);
    if tombstones.contains(&alert.id) || tombstones.contains(&alert.fingerprint()) {
        debug!(id = %alert.id, "discarding tombstoned re-announcement");
        return None;
    }

    Some(alert)
}

// ── Background merge loop ────────────────────────────────────────────

/// Consume push events for one session until cancelled.
///
/// The session-identity guard lives here, not in the stream layer: the
/// receiver may still hold buffered events from before a teardown, and
/// none of them may touch the next session's set.
pub(crate) async fn merge_loop(
    store: Arc<AlertStore>,
    tombstones: Arc<SyncMutex<Tombstones>>,
    merged_tx: broadcast::Sender<Arc<Alert>>,
    video_id: String,
    mut rx: broadcast::Receiver<Arc<RawEvent>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let admitted = admit_event(&event, &video_id, &tombstones.lock());
                        if let Some(alert) = admitted {
                            if store.merge(alert.clone()) {
                                debug!(id = %alert.id, kind = %alert.kind, "merged push alert");
                                let _ = merged_tx.send(Arc::new(alert));
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "merge loop lagged behind the push stream");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    debug!(video_id, "merge loop exiting");
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Re-label a generic 404 with the entity the caller was after.
fn not_found_as(entity: &str, identifier: &str, err: CoreError) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    } else {
        err
    }
}
