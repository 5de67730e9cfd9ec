// ── Reactive alert streams ──
//
// Subscription types for consuming alert-set changes from the AlertStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Alert;

/// A subscription to the session's alert set.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a `Stream`.
pub struct AlertSetStream {
    current: Arc<Vec<Alert>>,
    receiver: watch::Receiver<Arc<Vec<Alert>>>,
}

impl AlertSetStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Alert>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time.
    pub fn current(&self) -> &Arc<Vec<Alert>> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<Alert>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the sender (AlertStore) has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Alert>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> AlertWatchStream {
        AlertWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new `Arc<Vec<Alert>>` snapshot each time the underlying
/// alert set is mutated.
pub struct AlertWatchStream {
    inner: WatchStream<Arc<Vec<Alert>>>,
}

impl Stream for AlertWatchStream {
    type Item = Arc<Vec<Alert>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin when the inner type is Unpin, and
        // Arc<Vec<Alert>> always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
