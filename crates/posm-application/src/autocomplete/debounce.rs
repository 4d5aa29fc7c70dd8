//! Trailing-edge debounce on the tokio clock.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Runs only the last scheduled task once `delay` has passed without a newer
/// one.
///
/// Cancellation covers the waiting period only, and wins over a timer that
/// elapsed before the task was polled. A task that already started runs to
/// completion.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any waiting task with `task`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => task.await,
            }
        });
    }

    /// Drops the waiting task, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
