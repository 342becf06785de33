use async_trait::async_trait;

use crate::domain::customer::{Customer, CustomerPayload};
use crate::domain::types::CustomerId;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
#[cfg(test)]
pub mod test;

pub use http::HttpRepository;

/// Read access to the customer collection.
#[async_trait]
pub trait CustomerReader: Send + Sync {
    /// Lists customers matching `search`; an empty term means no filter.
    async fn list_customers(&self, search: &str) -> RepositoryResult<Vec<Customer>>;
    /// Fetches a single customer, `None` when the backend does not know the id.
    async fn get_customer(&self, id: &CustomerId) -> RepositoryResult<Option<Customer>>;
}

/// Mutations of the customer collection.
#[async_trait]
pub trait CustomerWriter: Send + Sync {
    async fn create_customer(&self, payload: &CustomerPayload) -> RepositoryResult<Customer>;
    async fn update_customer(
        &self,
        id: &CustomerId,
        payload: &CustomerPayload,
    ) -> RepositoryResult<Customer>;
    async fn delete_customer(&self, id: &CustomerId) -> RepositoryResult<()>;
}
