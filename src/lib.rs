#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod forms;

#[cfg(feature = "client")]
pub mod app;
#[cfg(feature = "client")]
pub mod error_conversions;
#[cfg(feature = "client")]
pub mod models;
#[cfg(feature = "client")]
pub mod query;
#[cfg(feature = "client")]
pub mod render;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod routes;
#[cfg(feature = "client")]
pub mod search;
#[cfg(feature = "client")]
pub mod services;
#[cfg(feature = "client")]
pub mod view;

/// Resource name of cached customer lists.
pub const CUSTOMERS_RESOURCE: &str = "customers";
/// Resource name of single customers; also the REST path segment.
pub const CUSTOMER_RESOURCE: &str = "customer";
/// Pause after the last keystroke before a search term is committed, in
/// milliseconds.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

/// Connects to the backend and runs the terminal client on stdin/stdout.
#[cfg(feature = "client")]
pub async fn run(config: models::config::ClientConfig) -> std::io::Result<()> {
    let repo = repository::HttpRepository::new(&config.api_url)
        .map_err(|e| std::io::Error::other(format!("Failed to create API client: {e}")))?;
    log::info!("Using customer API at {}", repo.base_url());

    let queries = query::QueryClient::new(std::sync::Arc::new(repo));
    let app = app::App::new(queries, &config)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    app.run(stdin, tokio::io::stdout()).await
}
