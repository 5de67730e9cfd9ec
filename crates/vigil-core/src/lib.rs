// vigil-core: Alert triage layer between vigil-api and consumers (CLI).

pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;
pub mod triage;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, TlsVerification};
pub use console::{Console, ReviewOutcome, SearchOutcome, SessionState};
pub use convert::SearchRow;
pub use error::CoreError;
pub use session::{AskCacheEntry, ConsoleSession, MemorySessionStore, SessionStore};
pub use store::AlertStore;
pub use stream::AlertSetStream;
pub use triage::{KeywordPolicy, TriageView};

// Re-export model types at the crate root for ergonomics.
pub use model::{Alert, AlertStatus, Severity, SeverityFilter, StatusFilter};
