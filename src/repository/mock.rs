//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::customer::{Customer, CustomerPayload};
use crate::domain::types::CustomerId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomerReader, CustomerWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl CustomerReader for Repository {
        async fn list_customers(&self, search: &str) -> RepositoryResult<Vec<Customer>>;
        async fn get_customer(&self, id: &CustomerId) -> RepositoryResult<Option<Customer>>;
    }

    #[async_trait]
    impl CustomerWriter for Repository {
        async fn create_customer(&self, payload: &CustomerPayload) -> RepositoryResult<Customer>;
        async fn update_customer(
            &self,
            id: &CustomerId,
            payload: &CustomerPayload,
        ) -> RepositoryResult<Customer>;
        async fn delete_customer(&self, id: &CustomerId) -> RepositoryResult<()>;
    }
}
