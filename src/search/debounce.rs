//! Trailing-edge debounce timer backed by a tokio task.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs the most recently scheduled callback once its delay elapses
/// without another `schedule` call.
///
/// Every arm carries a generation number. A timer whose generation is no
/// longer current stays silent even if its task was already woken.
#[derive(Default)]
pub struct Debouncer {
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending arm and arms a new one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let armed = self.generation.load(Ordering::SeqCst);
        let generation = Arc::clone(&self.generation);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation
                .compare_exchange(armed, armed + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                callback();
            }
        }));
    }

    /// Clears a pending arm without running its callback.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether an arm is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
