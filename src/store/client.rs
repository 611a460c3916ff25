use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::StoreError;

use super::models::{Configuration, HealthStatus, SaveCardRequest, SaveReceipt};

/// The seam between the builder session and the card configuration store.
///
/// The session only ever saves and loads; the richer service surface
/// (list/delete/clear/health) lives on [`StoreClient`] directly.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn save_card(&self, req: &SaveCardRequest) -> Result<SaveReceipt, StoreError>;

    /// Load the stored configuration for `form_id`. Not-found is `Ok(None)`,
    /// not an error.
    async fn load_card(&self, form_id: &str) -> Result<Option<Configuration>, StoreError>;
}

/// Error body the service returns on failures: `{error, details?}`.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: Option<String>,
    details: Option<String>,
}

/// HTTP client for the card configuration service.
pub struct StoreClient {
    base_url: String,
    http: reqwest::Client,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into a `ServiceStatus` error, pulling the
    /// message out of the `{error, details}` body when the service sent one.
    async fn service_error(resp: reqwest::Response) -> StoreError {
        let status = resp.status().as_u16();
        let message = match resp.json::<ServiceErrorBody>().await {
            Ok(body) => {
                let error = body.error.unwrap_or_else(|| "unknown error".to_string());
                match body.details {
                    Some(details) => format!("{}: {}", error, details),
                    None => error,
                }
            }
            Err(_) => "unknown error".to_string(),
        };
        StoreError::ServiceStatus { status, message }
    }

    pub async fn health(&self) -> Result<HealthStatus, StoreError> {
        let resp = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to reach card service health endpoint")?;
        if !resp.status().is_success() {
            return Err(Self::service_error(resp).await);
        }
        let health = resp
            .json::<HealthStatus>()
            .await
            .context("Failed to parse health response")?;
        Ok(health)
    }

    /// All stored configurations, most recently updated first.
    pub async fn list_cards(&self) -> Result<Vec<Configuration>, StoreError> {
        let resp = self
            .http
            .get(self.url("/configurations"))
            .send()
            .await
            .context("Failed to send list request to card service")?;
        if !resp.status().is_success() {
            return Err(Self::service_error(resp).await);
        }
        let configs = resp
            .json::<Vec<Configuration>>()
            .await
            .context("Failed to parse configurations list")?;
        Ok(configs)
    }

    pub async fn delete_card(&self, form_id: &str) -> Result<(), StoreError> {
        let resp = self
            .http
            .delete(self.url(&format!("/configurations/{}", form_id)))
            .send()
            .await
            .context("Failed to send delete request to card service")?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                form_id: form_id.to_string(),
            });
        }
        if !resp.status().is_success() {
            return Err(Self::service_error(resp).await);
        }
        Ok(())
    }

    /// Bulk clear; succeeds whether or not data existed.
    pub async fn clear_cards(&self) -> Result<(), StoreError> {
        let resp = self
            .http
            .delete(self.url("/configurations"))
            .send()
            .await
            .context("Failed to send clear request to card service")?;
        if !resp.status().is_success() {
            return Err(Self::service_error(resp).await);
        }
        Ok(())
    }
}

#[async_trait]
impl CardStore for StoreClient {
    async fn save_card(&self, req: &SaveCardRequest) -> Result<SaveReceipt, StoreError> {
        let resp = self
            .http
            .put(self.url(&format!("/configurations/{}", req.form_id)))
            .json(req)
            .send()
            .await
            .context("Failed to send save request to card service")?;
        if !resp.status().is_success() {
            return Err(Self::service_error(resp).await);
        }
        let receipt = resp
            .json::<SaveReceipt>()
            .await
            .context("Failed to parse save receipt")?;
        tracing::info!(form_id = %receipt.form_id, card_id = receipt.card_id, "Card saved");
        Ok(receipt)
    }

    async fn load_card(&self, form_id: &str) -> Result<Option<Configuration>, StoreError> {
        let resp = self
            .http
            .get(self.url(&format!("/configurations/{}", form_id)))
            .send()
            .await
            .context("Failed to send load request to card service")?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::service_error(resp).await);
        }
        let config = resp
            .json::<Configuration>()
            .await
            .context("Failed to parse stored configuration")?;
        Ok(Some(config))
    }
}
