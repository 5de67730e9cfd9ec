// Monitoring control endpoints
//
// Start/stop analysis jobs, pipeline queue status, the use-case catalog,
// and the liveness probe.

use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::models::{Health, MonitorReceipt, PipelineStatus, StartMonitoring, UseCase};

impl ConsoleClient {
    /// Start analyzing an uploaded video.
    ///
    /// `POST /api/start-monitoring`
    ///
    /// 400 on an unknown use case, 404 on an unknown video, 409 when a
    /// job is already running for it.
    pub async fn start_monitoring(&self, request: &StartMonitoring) -> Result<MonitorReceipt, Error> {
        let url = self.api_url("start-monitoring");
        debug!(video_id = %request.video_id, "starting monitoring");
        self.post(url, request).await
    }

    /// Stop the analysis job for a video.
    ///
    /// `POST /api/stop-monitoring?video_id={id}`
    pub async fn stop_monitoring(&self, video_id: &str) -> Result<MonitorReceipt, Error> {
        let mut url = self.api_url("stop-monitoring");
        url.query_pairs_mut().append_pair("video_id", video_id);
        debug!(video_id, "stopping monitoring");
        self.post_empty(url).await
    }

    /// Pipeline queue depth and in-flight jobs.
    ///
    /// `GET /api/status`
    pub async fn pipeline_status(&self) -> Result<PipelineStatus, Error> {
        let url = self.api_url("status");
        debug!("fetching pipeline status");
        self.get(url).await
    }

    /// The monitoring preset catalog.
    ///
    /// `GET /api/use-cases`
    pub async fn use_cases(&self) -> Result<Vec<UseCase>, Error> {
        let url = self.api_url("use-cases");
        debug!("fetching use cases");
        self.get(url).await
    }

    /// Service liveness probe.
    ///
    /// `GET /health`
    pub async fn health(&self) -> Result<Health, Error> {
        let url = self.root_url("health");
        debug!("health check");
        self.get(url).await
    }
}
