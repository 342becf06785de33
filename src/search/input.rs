use std::sync::Arc;
use std::time::Duration;

use crate::search::debounce::Debouncer;

type CommitFn = Arc<dyn Fn(String) + Send + Sync>;

/// Search box state: the raw text plus the two paths that commit it.
///
/// Keystrokes go through the debouncer; submit and clear commit right away.
/// Committed values only flow outwards through `on_commit`.
pub struct SearchInput {
    text: String,
    delay: Duration,
    debouncer: Debouncer,
    on_commit: CommitFn,
}

impl SearchInput {
    pub fn new<F>(delay: Duration, on_commit: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            text: String::new(),
            delay,
            debouncer: Debouncer::new(),
            on_commit: Arc::new(on_commit),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether a debounced commit is still waiting.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Replaces the text and restarts the debounce window.
    pub fn on_change(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let value = self.text.clone();
        let commit = Arc::clone(&self.on_commit);
        self.debouncer.schedule(self.delay, move || commit(value));
    }

    /// Commits the current text now, dropping any pending debounced commit.
    pub fn submit(&mut self) {
        self.debouncer.cancel();
        log::debug!("search submitted: {:?}", self.text);
        (self.on_commit)(self.text.clone());
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.submit();
    }

    pub fn close(&mut self) {
        self.debouncer.cancel();
    }
}
