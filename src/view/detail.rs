use serde::Serialize;

use crate::domain::customer::Customer;
use crate::query::QuerySnapshot;
use crate::view::EmptyState;

const NOT_AVAILABLE: &str = "N/A";

/// Formatted customer record for the detail page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerDetails {
    pub id: String,
    pub initials: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub show_address: bool,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub member_since: String,
}

fn or_na(value: &Option<String>) -> String {
    value.as_deref().unwrap_or(NOT_AVAILABLE).to_string()
}

impl From<&Customer> for CustomerDetails {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            initials: customer.initials(),
            full_name: customer.full_name(),
            first_name: customer.first_name.to_string(),
            last_name: customer.last_name.to_string(),
            email: customer.email.to_string(),
            phone_number: or_na(&customer.phone_number),
            show_address: customer.has_address(),
            address: or_na(&customer.address),
            city: or_na(&customer.city),
            state: or_na(&customer.state),
            country: or_na(&customer.country),
            member_since: customer.created_at.format("%B %-d, %Y").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailView {
    Loading,
    NotFound(EmptyState),
    /// The request failed before any record was received.
    Unavailable(EmptyState),
    Details { customer: CustomerDetails },
}

impl DetailView {
    /// The not-found empty state is reserved for a backend that answered
    /// without a record; a failed request with nothing cached is `Unavailable`.
    pub fn project(snapshot: &QuerySnapshot<Option<Customer>>) -> Self {
        if snapshot.loading {
            return DetailView::Loading;
        }
        match (&snapshot.data, &snapshot.error) {
            (Some(Some(customer)), _) => DetailView::Details {
                customer: CustomerDetails::from(customer),
            },
            (None, Some(_)) => DetailView::Unavailable(EmptyState::new(
                "Customer could not be loaded",
                Some("Please try again"),
            )),
            _ => DetailView::NotFound(EmptyState::new(
                "Customer not found",
                Some("Invalid customer id"),
            )),
        }
    }
}
