//! Client-side routes: `/` for the list and `/customer/:id` for one record.

use std::fmt::{Display, Formatter};

use crate::CUSTOMER_RESOURCE;
use crate::domain::types::CustomerId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Customer(CustomerId),
    NotFound(String),
}

impl Route {
    /// Resolves a path. Query strings and fragments are ignored, as is a
    /// single trailing slash.
    pub fn parse(path: &str) -> Self {
        let clean = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = clean.strip_suffix('/').unwrap_or(clean);
        if trimmed.is_empty() {
            return Route::Home;
        }

        let mut segments = trimmed.trim_start_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(resource), Some(id), None) if resource == CUSTOMER_RESOURCE => {
                match CustomerId::new(id) {
                    Ok(id) => Route::Customer(id),
                    Err(_) => Route::NotFound(clean.to_string()),
                }
            }
            _ => Route::NotFound(clean.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Customer(id) => format!("/{CUSTOMER_RESOURCE}/{id}"),
            Route::NotFound(path) => path.clone(),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
