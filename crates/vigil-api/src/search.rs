// Footage search endpoint
//
// One POST covering both modes: `monitor` (detections first) and `ask`
// (footage Q&A with context summaries). The prose answer is built
// service-side; the console treats it as opaque.

use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::models::{SearchRequest, SearchResponse};

impl ConsoleClient {
    /// Search detected events and footage context.
    ///
    /// `POST /api/search`
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, Error> {
        let url = self.api_url("search");
        debug!(
            query = request.query.as_deref().unwrap_or(""),
            mode = ?request.mode,
            "searching footage"
        );
        self.post(url, request).await
    }
}
