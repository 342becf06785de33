//! View-facing query controllers.
//!
//! A controller remembers which key its view currently shows. Every response
//! is written to the shared cache, but only a response whose key still
//! matches the current key at completion time may change the visible state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::query::{QueryClient, QueryKey};
use crate::repository::CustomerReader;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// What a view renders: the key it shows, whether a request is pending and
/// the last data or error received for that key.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySnapshot<T> {
    pub key: Option<QueryKey>,
    pub loading: bool,
    pub data: Option<T>,
    pub error: Option<RepositoryError>,
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self {
            key: None,
            loading: false,
            data: None,
            error: None,
        }
    }
}

struct ViewCell<T> {
    state: Arc<Mutex<QuerySnapshot<T>>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<T> Clone for ViewCell<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<T: Clone> ViewCell<T> {
    fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(QuerySnapshot::default())),
            revision: Arc::new(revision),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QuerySnapshot<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn current_key(&self) -> Option<QueryKey> {
        self.lock().key.clone()
    }

    fn snapshot(&self) -> QuerySnapshot<T> {
        self.lock().clone()
    }

    /// Makes `key` the one the view shows. Previous data stays visible
    /// underneath the loading flag.
    fn begin(&self, key: QueryKey) {
        {
            let mut state = self.lock();
            state.key = Some(key);
            state.loading = true;
        }
        self.notify();
    }

    /// Applies `result` if `key` is still current. Returns whether it did.
    fn settle(&self, key: &QueryKey, result: RepositoryResult<T>) -> bool {
        {
            let mut state = self.lock();
            if state.key.as_ref() != Some(key) {
                log::debug!("discarding superseded response for {key}");
                return false;
            }
            state.loading = false;
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(err) => {
                    log::warn!("failed to load {key}: {err}");
                    state.error = Some(err);
                }
            }
        }
        self.notify();
        true
    }
}

/// Drives the customer list from the committed search term.
pub struct CustomerListController<R> {
    queries: QueryClient<R>,
    view: ViewCell<Arc<Vec<Customer>>>,
}

impl<R> Clone for CustomerListController<R> {
    fn clone(&self) -> Self {
        Self {
            queries: self.queries.clone(),
            view: self.view.clone(),
        }
    }
}

impl<R> CustomerListController<R>
where
    R: CustomerReader + 'static,
{
    pub fn new(queries: QueryClient<R>) -> Self {
        Self {
            queries,
            view: ViewCell::new(),
        }
    }

    /// Loads the list for `committed`; the empty term means no filter.
    pub async fn fetch(&self, committed: &str) {
        let key = QueryKey::customers(committed);
        self.view.begin(key.clone());
        let result = self.queries.customers(committed).await;
        self.view.settle(&key, result);
    }

    /// Fetches the current term again, typically after an invalidation.
    pub async fn refresh(&self) {
        let term = self.committed_term().unwrap_or_default();
        self.fetch(&term).await;
    }

    /// Term of the key currently shown, `None` before the first fetch.
    pub fn committed_term(&self) -> Option<String> {
        match self.view.current_key() {
            Some(QueryKey::Customers { search }) => Some(search),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> QuerySnapshot<Arc<Vec<Customer>>> {
        self.view.snapshot()
    }

    /// Receiver that changes whenever the visible state does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.view.revision.subscribe()
    }
}

/// Drives the customer detail page.
pub struct CustomerDetailController<R> {
    queries: QueryClient<R>,
    view: ViewCell<Option<Customer>>,
}

impl<R> Clone for CustomerDetailController<R> {
    fn clone(&self) -> Self {
        Self {
            queries: self.queries.clone(),
            view: self.view.clone(),
        }
    }
}

impl<R> CustomerDetailController<R>
where
    R: CustomerReader + 'static,
{
    pub fn new(queries: QueryClient<R>) -> Self {
        Self {
            queries,
            view: ViewCell::new(),
        }
    }

    pub async fn fetch(&self, id: &CustomerId) {
        let key = QueryKey::customer(id);
        self.view.begin(key.clone());
        let result = self.queries.customer(id).await;
        self.view.settle(&key, result);
    }

    pub async fn refresh(&self) {
        if let Some(id) = self.current_id() {
            self.fetch(&id).await;
        }
    }

    pub fn current_id(&self) -> Option<CustomerId> {
        match self.view.current_key() {
            Some(QueryKey::Customer { id }) => Some(id),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> QuerySnapshot<Option<Customer>> {
        self.view.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.view.revision.subscribe()
    }
}
