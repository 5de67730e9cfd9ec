// ── Triage engines: fingerprint dedup and priority ranking ──
//
// Pure functions over alert slices. The ingestion coordinator applies
// dedup on every insertion; consumers apply ranking on every read.

mod dedup;
mod priority;

pub use dedup::dedup_by_fingerprint;
pub use priority::{KeywordPolicy, TriageView, keyword_score, rank};
