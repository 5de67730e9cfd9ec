// vigil-api: Async Rust client for the vigil monitoring service (REST + SSE)

pub mod analytics;
pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod monitoring;
pub mod search;
pub mod sse;
pub mod transport;
pub mod videos;

pub use client::ConsoleClient;
pub use error::Error;
