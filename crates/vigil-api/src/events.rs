// Event endpoints
//
// Bulk listing (`/api/events`) and the review mutation
// (`/api/events/{id}/review`). The live stream lives in `sse`.

use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::models::{EventQuery, RawEvent, ReviewRequest};

impl ConsoleClient {
    /// List detected events, newest first.
    ///
    /// `GET /api/events?status&event_type&video_id&limit`
    ///
    /// The service caps the result at `limit` (default 50 when omitted).
    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<RawEvent>, Error> {
        let mut url = self.api_url("events");
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(ref status) = query.status {
                pairs.append_pair("status", status);
            }
            if let Some(ref event_type) = query.event_type {
                pairs.append_pair("event_type", event_type);
            }
            if let Some(ref video_id) = query.video_id {
                pairs.append_pair("video_id", video_id);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        debug!(?query, "listing events");
        self.get(url).await
    }

    /// Apply a review disposition to an event.
    ///
    /// `POST /api/events/{id}/review`
    ///
    /// Returns the updated event; 404 if the id is unknown.
    pub async fn review_event(&self, id: &str, review: &ReviewRequest) -> Result<RawEvent, Error> {
        let url = self.api_url(&format!("events/{id}/review"));
        debug!(id, status = ?review.status, "reviewing event");
        self.post(url, review).await
    }
}
