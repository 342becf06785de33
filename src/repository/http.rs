//! Thin `reqwest` wrapper over the `/customer` REST resource.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::CUSTOMER_RESOURCE;
use crate::domain::customer::{Customer, CustomerPayload};
use crate::domain::types::CustomerId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CustomerReader, CustomerWriter};

/// Repository backed by the customer REST API.
///
/// Every path is resolved against `base_url` as `{base_url}/customer[/{id}]`.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    pub fn new(base_url: &str) -> RepositoryResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| RepositoryError::ValidationError(format!("invalid api url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::ValidationError(format!(
                "api url cannot be used as a base: {base_url}"
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, id: Option<&CustomerId>) -> RepositoryResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RepositoryError::ValidationError("api url cannot be used as a base".to_string())
            })?;
            segments.pop_if_empty().push(CUSTOMER_RESOURCE);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }
}

/// Turns a non-success response into a [`RepositoryError`], keeping the
/// backend's `message` when the body carries one.
async fn check_status(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(RepositoryError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RepositoryError::Server {
        status: status.as_u16(),
        message: extract_message(&body),
    })
}

fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[async_trait]
impl CustomerReader for HttpRepository {
    async fn list_customers(&self, search: &str) -> RepositoryResult<Vec<Customer>> {
        let mut request = self.client.get(self.endpoint(None)?);
        if !search.is_empty() {
            request = request.query(&[("search", search)]);
        }
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_customer(&self, id: &CustomerId) -> RepositoryResult<Option<Customer>> {
        let response = self.client.get(self.endpoint(Some(id))?).send().await?;
        match check_status(response).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl CustomerWriter for HttpRepository {
    async fn create_customer(&self, payload: &CustomerPayload) -> RepositoryResult<Customer> {
        let response = self
            .client
            .post(self.endpoint(None)?)
            .json(payload)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn update_customer(
        &self,
        id: &CustomerId,
        payload: &CustomerPayload,
    ) -> RepositoryResult<Customer> {
        let response = self
            .client
            .put(self.endpoint(Some(id))?)
            .json(payload)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn delete_customer(&self, id: &CustomerId) -> RepositoryResult<()> {
        let response = self.client.delete(self.endpoint(Some(id))?).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_resource_to_root() {
        let repo = HttpRepository::new("http://localhost:3000").unwrap();
        let id = CustomerId::new("a b").unwrap();

        assert_eq!(
            repo.endpoint(None).unwrap().as_str(),
            "http://localhost:3000/customer"
        );
        assert_eq!(
            repo.endpoint(Some(&id)).unwrap().as_str(),
            "http://localhost:3000/customer/a%20b"
        );
    }

    #[test]
    fn endpoint_keeps_configured_prefix() {
        let repo = HttpRepository::new("http://localhost:8080/api/").unwrap();

        assert_eq!(
            repo.endpoint(None).unwrap().as_str(),
            "http://localhost:8080/api/customer"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            HttpRepository::new("mailto:crm@example.com"),
            Err(RepositoryError::ValidationError(_))
        ));
        assert!(HttpRepository::new("not a url").is_err());
    }

    #[test]
    fn extracts_server_message_variants() {
        assert_eq!(
            extract_message(r#"{"message":"Email already exists"}"#).as_deref(),
            Some("Email already exists")
        );
        assert_eq!(
            extract_message(r#"{"message":["email must be an email","x"]}"#).as_deref(),
            Some("email must be an email; x")
        );
        assert_eq!(extract_message(r#"{"message":""}"#), None);
        assert_eq!(extract_message("<html>oops</html>"), None);
    }
}
