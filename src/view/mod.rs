//! Pure projections from query state to what the screen shows.

use serde::Serialize;

pub mod detail;
pub mod list;

pub use detail::{CustomerDetails, DetailView};
pub use list::{CustomerCard, ListView};

/// Message block shown in place of content.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub description: Option<String>,
}

impl EmptyState {
    pub fn new(message: &str, description: Option<&str>) -> Self {
        Self {
            message: message.to_string(),
            description: description.map(str::to_string),
        }
    }
}
