// Analytics endpoint
//
// Review-outcome summary plus per-category breakdown.

use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::models::{AnalyticsQuery, AnalyticsReport};

impl ConsoleClient {
    /// Fetch review analytics, optionally bounded by date and video.
    ///
    /// `GET /api/analytics?from_date&to_date&video_id`
    ///
    /// Dates go over the wire as ISO `YYYY-MM-DD`.
    pub async fn analytics(&self, query: &AnalyticsQuery) -> Result<AnalyticsReport, Error> {
        let mut url = self.api_url("analytics");
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(from) = query.from_date {
                pairs.append_pair("from_date", &from.format("%Y-%m-%d").to_string());
            }
            if let Some(to) = query.to_date {
                pairs.append_pair("to_date", &to.format("%Y-%m-%d").to_string());
            }
            if let Some(ref video_id) = query.video_id {
                pairs.append_pair("video_id", video_id);
            }
        }
        debug!(?query, "fetching analytics");
        self.get(url).await
    }
}
