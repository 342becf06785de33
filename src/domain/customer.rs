use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomerEmail, CustomerId, CustomerName};

/// Customer record as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: CustomerName,
    pub last_name: CustomerName,
    pub email: CustomerEmail,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// First name and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Upper-cased first letters of both names.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Whether any of the address fields carries a value.
    pub fn has_address(&self) -> bool {
        [&self.address, &self.city, &self.state, &self.country]
            .iter()
            .any(|field| field.is_some())
    }
}

/// Editable subset of a customer sent on create and update.
///
/// Identifier and creation timestamp are owned by the backend and are never
/// part of the payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub first_name: CustomerName,
    pub last_name: CustomerName,
    pub email: CustomerEmail,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl CustomerPayload {
    #[must_use]
    pub fn new(first_name: CustomerName, last_name: CustomerName, email: CustomerEmail) -> Self {
        Self {
            first_name,
            last_name,
            email,
            phone_number: None,
            address: None,
            city: None,
            state: None,
            country: None,
        }
    }

    /// Sets the optional contact fields, dropping blank values.
    #[must_use]
    pub fn with_contact(
        mut self,
        phone_number: Option<String>,
        address: Option<String>,
        city: Option<String>,
        state: Option<String>,
        country: Option<String>,
    ) -> Self {
        self.phone_number = clean_optional(phone_number);
        self.address = clean_optional(address);
        self.city = clean_optional(city);
        self.state = clean_optional(state);
        self.country = clean_optional(country);
        self
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
