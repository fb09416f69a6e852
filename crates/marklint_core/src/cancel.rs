//! Cooperative cancellation shared by the runner, workers and rules.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken as SharedToken;

/// A cloneable cancel flag with an optional deadline.
///
/// Clones share state: cancelling one cancels all of them. Workers only
/// poll, so the deadline is checked on each poll rather than by a timer.
///
/// ```rust
/// use marklint_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let worker_view = token.clone();
/// token.cancel();
/// assert!(worker_view.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: SharedToken,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// Creates a token that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that also reports cancellation once `timeout` elapses.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            inner: SharedToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        if self.inner.is_cancelled() {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.inner.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves once [`cancel`](Self::cancel) is called on any clone.
    ///
    /// The deadline is not observed here; it only fires through polling.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }
}
