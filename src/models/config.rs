//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::DEFAULT_SEARCH_DEBOUNCE_MS;

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the terminal client.
pub struct ClientConfig {
    /// Root of the customer backend; requests go to `{api_url}/customer`.
    pub api_url: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl ClientConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
