use std::sync::Arc;

use serde::Serialize;

use crate::domain::customer::Customer;
use crate::query::QuerySnapshot;
use crate::routes::Route;
use crate::view::EmptyState;

pub const EMPTY_LIST_MESSAGE: &str = "No customers found";
pub const LIST_UNAVAILABLE_MESSAGE: &str = "Customers could not be loaded";

/// One customer in the list, already formatted for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerCard {
    pub id: String,
    pub initials: String,
    pub full_name: String,
    pub email: String,
    pub href: String,
}

impl From<&Customer> for CustomerCard {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            initials: customer.initials(),
            full_name: customer.full_name(),
            email: customer.email.to_string(),
            href: Route::Customer(customer.id.clone()).path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListView {
    Loading,
    Empty(EmptyState),
    /// The request failed and there is no earlier result to keep showing.
    Unavailable(EmptyState),
    Cards { cards: Vec<CustomerCard> },
}

impl ListView {
    /// Cards keep the server order; nothing is sorted or filtered here.
    pub fn project(
        snapshot: &QuerySnapshot<Arc<Vec<Customer>>>,
        empty_description: Option<&str>,
    ) -> Self {
        if snapshot.loading {
            return ListView::Loading;
        }
        if snapshot.data.is_none() && snapshot.error.is_some() {
            return ListView::Unavailable(EmptyState::new(LIST_UNAVAILABLE_MESSAGE, None));
        }
        let customers = snapshot.data.as_deref().map_or(&[][..], Vec::as_slice);
        if customers.is_empty() {
            return ListView::Empty(EmptyState::new(EMPTY_LIST_MESSAGE, empty_description));
        }
        ListView::Cards {
            cards: customers.iter().map(CustomerCard::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::test::customer;

    fn snapshot(loading: bool, data: Option<Vec<Customer>>) -> QuerySnapshot<Arc<Vec<Customer>>> {
        QuerySnapshot {
            loading,
            data: data.map(Arc::new),
            ..QuerySnapshot::default()
        }
    }

    #[test]
    fn loading_wins_over_stale_data() {
        let view = ListView::project(
            &snapshot(true, Some(vec![customer("1", "Bob", "Smith", "b@x.io")])),
            None,
        );
        assert_eq!(view, ListView::Loading);
    }

    #[test]
    fn empty_result_shows_empty_state() {
        let view = ListView::project(&snapshot(false, Some(Vec::new())), Some("Try another search"));
        assert_eq!(
            view,
            ListView::Empty(EmptyState::new("No customers found", Some("Try another search")))
        );
        assert_eq!(
            ListView::project(&snapshot(false, None), None),
            ListView::Empty(EmptyState::new("No customers found", None))
        );
    }

    #[test]
    fn failed_first_load_is_not_an_empty_result() {
        let failed = QuerySnapshot {
            error: Some(RepositoryError::ConnectionError("refused".into())),
            ..snapshot(false, None)
        };
        assert_eq!(
            ListView::project(&failed, None),
            ListView::Unavailable(EmptyState::new("Customers could not be loaded", None))
        );

        let kept = QuerySnapshot {
            error: Some(RepositoryError::ConnectionError("refused".into())),
            ..snapshot(false, Some(vec![customer("1", "Bob", "Smith", "b@x.io")]))
        };
        assert!(matches!(ListView::project(&kept, None), ListView::Cards { .. }));
    }

    #[test]
    fn cards_follow_server_order() {
        let view = ListView::project(
            &snapshot(
                false,
                Some(vec![
                    customer("9", "zoe", "young", "zoe@example.com"),
                    customer("2", "Adam", "Baker", "adam@example.com"),
                ]),
            ),
            None,
        );
        let ListView::Cards { cards } = view else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].initials, "ZY");
        assert_eq!(cards[0].full_name, "zoe young");
        assert_eq!(cards[0].href, "/customer/9");
        assert_eq!(cards[1].email, "adam@example.com");
    }
}
