//! In-memory repository standing in for the backend in unit tests.
//!
//! List requests can be held open with [`TestRepository::gate`] so tests
//! decide the order in which concurrent responses arrive.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::oneshot;

use crate::domain::customer::{Customer, CustomerPayload};
use crate::domain::types::{CustomerEmail, CustomerId, CustomerName};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CustomerReader, CustomerWriter};

type ListReply = RepositoryResult<Vec<Customer>>;

#[derive(Default)]
pub struct TestRepository {
    customers: Mutex<Vec<Customer>>,
    list_calls: Mutex<Vec<String>>,
    get_calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<ListReply>>>,
    next_id: Mutex<u32>,
}

pub fn customer(id: &str, first: &str, last: &str, email: &str) -> Customer {
    Customer {
        id: CustomerId::new(id).unwrap(),
        first_name: CustomerName::new(first).unwrap(),
        last_name: CustomerName::new(last).unwrap(),
        email: CustomerEmail::new(email).unwrap(),
        phone_number: None,
        address: None,
        city: None,
        state: None,
        country: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
    }
}

impl TestRepository {
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let repo = Self::default();
        *repo.customers.lock().unwrap() = customers;
        repo
    }

    /// Holds the next list request for `search` until the returned sender fires.
    pub fn gate(&self, search: &str) -> oneshot::Sender<ListReply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(search.to_string(), rx);
        tx
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.get_calls.lock().unwrap().clone()
    }

    fn matching(&self, search: &str) -> Vec<Customer> {
        let needle = search.to_lowercase();
        self.customers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.full_name().to_lowercase().contains(&needle)
                    || c.email.as_str().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CustomerReader for TestRepository {
    async fn list_customers(&self, search: &str) -> RepositoryResult<Vec<Customer>> {
        self.list_calls.lock().unwrap().push(search.to_string());
        let gate = self.gates.lock().unwrap().remove(search);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(RepositoryError::Unexpected("gate dropped".into()))),
            None => Ok(self.matching(search)),
        }
    }

    async fn get_customer(&self, id: &CustomerId) -> RepositoryResult<Option<Customer>> {
        self.get_calls.lock().unwrap().push(id.to_string());
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }
}

#[async_trait]
impl CustomerWriter for TestRepository {
    async fn create_customer(&self, payload: &CustomerPayload) -> RepositoryResult<Customer> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("srv-{next}")
        };
        let mut created = customer(
            &id,
            payload.first_name.as_str(),
            payload.last_name.as_str(),
            payload.email.as_str(),
        );
        created.phone_number = payload.phone_number.clone();
        created.address = payload.address.clone();
        created.city = payload.city.clone();
        created.state = payload.state.clone();
        created.country = payload.country.clone();
        self.customers.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_customer(
        &self,
        id: &CustomerId,
        payload: &CustomerPayload,
    ) -> RepositoryResult<Customer> {
        let mut customers = self.customers.lock().unwrap();
        let existing = customers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        existing.first_name = payload.first_name.clone();
        existing.last_name = payload.last_name.clone();
        existing.email = payload.email.clone();
        existing.phone_number = payload.phone_number.clone();
        existing.address = payload.address.clone();
        existing.city = payload.city.clone();
        existing.state = payload.state.clone();
        existing.country = payload.country.clone();
        Ok(existing.clone())
    }

    async fn delete_customer(&self, id: &CustomerId) -> RepositoryResult<()> {
        let mut customers = self.customers.lock().unwrap();
        let before = customers.len();
        customers.retain(|c| &c.id != id);
        if customers.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
