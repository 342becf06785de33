//! Customer queries: cached, coalesced reads plus the invalidation hooks used
//! by mutations.

use std::sync::Arc;

use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::repository::CustomerReader;
use crate::repository::errors::RepositoryResult;

pub mod cache;
pub mod controller;
pub mod key;

pub use cache::{QueryCache, QueryStatus};
pub use controller::{CustomerDetailController, CustomerListController, QuerySnapshot};
pub use key::QueryKey;

/// Search terms whose results are kept.
pub const MAX_CACHED_LISTS: usize = 50;
/// Customer records kept.
pub const MAX_CACHED_RECORDS: usize = 200;

/// Owner of the customer result caches.
///
/// Cloning is cheap and every clone shares the same caches, so the list view,
/// the detail view and the mutation services observe one another's
/// invalidations.
pub struct QueryClient<R> {
    repo: Arc<R>,
    lists: QueryCache<Arc<Vec<Customer>>>,
    records: QueryCache<Option<Customer>>,
}

impl<R> Clone for QueryClient<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            lists: self.lists.clone(),
            records: self.records.clone(),
        }
    }
}

impl<R> QueryClient<R>
where
    R: CustomerReader + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            lists: QueryCache::with_capacity(MAX_CACHED_LISTS),
            records: QueryCache::with_capacity(MAX_CACHED_RECORDS),
        }
    }

    /// Backend used for reads and mutations.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Customers matching `search`, keyed by `("customers", search)`.
    pub async fn customers(&self, search: &str) -> RepositoryResult<Arc<Vec<Customer>>> {
        let term = search.trim().to_string();
        let key = QueryKey::customers(&term);
        let repo = Arc::clone(&self.repo);
        self.lists
            .fetch(key, move || {
                let repo = Arc::clone(&repo);
                let term = term.clone();
                async move { repo.list_customers(&term).await.map(Arc::new) }
            })
            .await
    }

    /// Single customer keyed by `("customer", id)`; `None` when it does not exist.
    pub async fn customer(&self, id: &CustomerId) -> RepositoryResult<Option<Customer>> {
        let repo = Arc::clone(&self.repo);
        let owned = id.clone();
        self.records
            .fetch(QueryKey::customer(id), move || {
                let repo = Arc::clone(&repo);
                let id = owned.clone();
                async move { repo.get_customer(&id).await }
            })
            .await
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match key {
            QueryKey::Customers { .. } => self.lists.status(key),
            QueryKey::Customer { .. } => self.records.status(key),
        }
    }

    pub fn invalidate(&self, key: &QueryKey) {
        match key {
            QueryKey::Customers { .. } => self.lists.invalidate(key),
            QueryKey::Customer { .. } => self.records.invalidate(key),
        }
    }

    /// Invalidates every list key, whatever its search term.
    pub fn invalidate_lists(&self) {
        self.lists.invalidate_where(QueryKey::is_list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::{TestRepository, customer};

    fn client() -> (Arc<TestRepository>, QueryClient<TestRepository>) {
        let repo = Arc::new(TestRepository::with_customers(vec![
            customer("1", "Bob", "Smith", "bob@example.com"),
            customer("2", "Alice", "Jones", "alice@example.com"),
        ]));
        (Arc::clone(&repo), QueryClient::new(repo))
    }

    #[tokio::test]
    async fn same_term_is_fetched_once_while_fresh() {
        let (repo, queries) = client();

        let first = queries.customers("bob").await.unwrap();
        let again = queries.customers(" bob ").await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first, again);
        assert_eq!(repo.list_calls(), vec!["bob"]);
        assert_eq!(queries.status(&QueryKey::customers("bob")), QueryStatus::Success);
    }

    #[tokio::test]
    async fn overlapping_requests_for_one_term_hit_the_backend_once() {
        let (repo, queries) = client();
        let gate = repo.gate("al");

        let (a, b, ()) = tokio::join!(queries.customers("al"), queries.customers("al"), async {
            tokio::task::yield_now().await;
            gate.send(Ok(vec![customer("2", "Alice", "Jones", "alice@example.com")]))
                .unwrap();
        });

        assert_eq!(a.unwrap().len(), 1);
        assert_eq!(b.unwrap().len(), 1);
        assert_eq!(repo.list_calls(), vec!["al"]);
    }

    #[tokio::test]
    async fn invalidating_lists_refetches_every_term() {
        let (repo, queries) = client();
        queries.customers("").await.unwrap();
        queries.customers("bob").await.unwrap();

        queries.invalidate_lists();
        queries.customers("").await.unwrap();
        queries.customers("bob").await.unwrap();

        assert_eq!(repo.list_calls(), vec!["", "bob", "", "bob"]);
    }

    #[tokio::test]
    async fn missing_record_is_none_and_record_invalidation_is_scoped() {
        let (repo, queries) = client();
        let known = CustomerId::new("1").unwrap();
        let unknown = CustomerId::new("404").unwrap();

        assert!(queries.customer(&known).await.unwrap().is_some());
        assert_eq!(queries.customer(&unknown).await.unwrap(), None);

        queries.invalidate(&QueryKey::customer(&known));
        queries.customer(&known).await.unwrap();
        queries.customer(&unknown).await.unwrap();

        assert_eq!(repo.get_calls(), vec!["1", "404", "1"]);
    }

    #[tokio::test]
    async fn list_results_are_bounded() {
        let (_, queries) = client();

        for n in 0..=MAX_CACHED_LISTS {
            queries.customers(&format!("term {n}")).await.unwrap();
        }

        assert_eq!(queries.lists.len(), MAX_CACHED_LISTS);
        assert_eq!(queries.status(&QueryKey::customers("term 0")), QueryStatus::Idle);
    }
}
