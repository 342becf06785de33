use std::fmt::{Display, Formatter};

use crate::domain::types::CustomerId;
use crate::{CUSTOMER_RESOURCE, CUSTOMERS_RESOURCE};

/// Identity of a cached fetch: resource name plus its parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `("customers", committed search term)`.
    Customers { search: String },
    /// `("customer", id)`.
    Customer { id: CustomerId },
}

impl QueryKey {
    /// Builds the list key. Surrounding whitespace carries no meaning, so
    /// `"  "` and `""` share the unfiltered key.
    pub fn customers(search: &str) -> Self {
        QueryKey::Customers {
            search: search.trim().to_string(),
        }
    }

    pub fn customer(id: &CustomerId) -> Self {
        QueryKey::Customer { id: id.clone() }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            QueryKey::Customers { .. } => CUSTOMERS_RESOURCE,
            QueryKey::Customer { .. } => CUSTOMER_RESOURCE,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, QueryKey::Customers { .. })
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKey::Customers { search } => write!(f, "{}[{search:?}]", self.resource()),
            QueryKey::Customer { id } => write!(f, "{}[{id}]", self.resource()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_share_the_unfiltered_key() {
        assert_eq!(QueryKey::customers("  "), QueryKey::customers(""));
        assert_eq!(QueryKey::customers(" bob "), QueryKey::customers("bob"));
        assert_ne!(QueryKey::customers("bob"), QueryKey::customers("Bob"));
    }

    #[test]
    fn keys_name_their_resource() {
        let id = CustomerId::new("42").unwrap();
        assert_eq!(QueryKey::customers("x").resource(), "customers");
        assert_eq!(QueryKey::customer(&id).resource(), "customer");
        assert_eq!(QueryKey::customer(&id).to_string(), "customer[42]");
        assert_eq!(QueryKey::customers("a").to_string(), "customers[\"a\"]");
    }
}
