//! Customer mutations: validate the form, call the backend, then invalidate
//! whatever cached queries the change affects.

use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::forms::customer::CustomerForm;
use crate::query::{QueryClient, QueryKey};
use crate::repository::{CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult};

/// Parses a customer id typed by the user.
pub fn parse_customer_id(raw: &str) -> ServiceResult<CustomerId> {
    Ok(CustomerId::new(raw)?)
}

/// Creates a customer from the form. Invalid forms never reach the backend.
pub async fn create_customer<R>(queries: &QueryClient<R>, form: &CustomerForm) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + 'static,
{
    let payload = form.to_payload().map_err(|err| {
        log::warn!("Rejected customer form: {err}");
        ServiceError::from(err)
    })?;

    let customer = queries
        .repository()
        .create_customer(&payload)
        .await
        .map_err(|err| {
            log::error!("Failed to create customer: {err}");
            ServiceError::from(err)
        })?;

    queries.invalidate_lists();
    log::info!("Created customer {}", customer.id);
    Ok(customer)
}

/// Replaces the editable fields of customer `id` with the form values.
pub async fn update_customer<R>(
    queries: &QueryClient<R>,
    id: &CustomerId,
    form: &CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + 'static,
{
    let payload = form.to_payload().map_err(|err| {
        log::warn!("Rejected customer form for {id}: {err}");
        ServiceError::from(err)
    })?;

    let customer = queries
        .repository()
        .update_customer(id, &payload)
        .await
        .map_err(|err| {
            log::error!("Failed to update customer {id}: {err}");
            ServiceError::from(err)
        })?;

    queries.invalidate_lists();
    queries.invalidate(&QueryKey::customer(id));
    Ok(customer)
}

pub async fn delete_customer<R>(queries: &QueryClient<R>, id: &CustomerId) -> ServiceResult<()>
where
    R: CustomerReader + CustomerWriter + 'static,
{
    queries
        .repository()
        .delete_customer(id)
        .await
        .map_err(|err| {
            log::error!("Failed to delete customer {id}: {err}");
            ServiceError::from(err)
        })?;

    queries.invalidate_lists();
    queries.invalidate(&QueryKey::customer(id));
    log::info!("Deleted customer {id}");
    Ok(())
}
