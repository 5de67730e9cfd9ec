// Video endpoints
//
// Session detail, processing progress, and multipart upload.

use std::path::Path;

use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::models::{ProcessingStatus, UploadReceipt, VideoDetail};

impl ConsoleClient {
    /// Fetch one video session.
    ///
    /// `GET /api/videos/{id}` -- 404 if the id is unknown.
    pub async fn video(&self, id: &str) -> Result<VideoDetail, Error> {
        let url = self.api_url(&format!("videos/{id}"));
        debug!(id, "fetching video");
        self.get(url).await
    }

    /// Fetch chunk-level processing progress for a video.
    ///
    /// `GET /api/videos/{id}/processing`
    pub async fn processing(&self, id: &str) -> Result<ProcessingStatus, Error> {
        let url = self.api_url(&format!("videos/{id}/processing"));
        debug!(id, "fetching processing status");
        self.get(url).await
    }

    /// Upload a video file for analysis.
    ///
    /// `POST /api/upload` (multipart: `file`, `use_case`)
    ///
    /// The file is streamed, not buffered. 400 on an unknown use case.
    pub async fn upload_video(&self, path: &Path, use_case: &str) -> Result<UploadReceipt, Error> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::UploadSource {
                message: format!("not a file path: {}", path.display()),
            })?;

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| Error::UploadSource {
                message: format!("failed to open {}: {e}", path.display()),
            })?;

        let part = reqwest::multipart::Part::stream(reqwest::Body::wrap_stream(
            ReaderStream::new(file),
        ))
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(Error::Transport)?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("use_case", use_case.to_string());

        let url = self.api_url("upload");
        debug!(path = %path.display(), use_case, "uploading video");
        self.post_multipart(url, form).await
    }
}
