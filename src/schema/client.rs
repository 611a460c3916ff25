use anyhow::Context;

use crate::errors::SchemaError;

use super::{FormSchema, RawFormPayload, validate};

/// Client for the form-schema host.
///
/// Read-only dependency: the host owns form definitions, we only fetch them
/// by slug and validate them at the boundary.
pub struct SchemaClient {
    base_url: String,
    http: reqwest::Client,
}

impl SchemaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch and validate the form definition for `slug`.
    pub async fn fetch(&self, slug: &str) -> Result<FormSchema, SchemaError> {
        let url = format!("{}/api/form/load", self.base_url.trim_end_matches('/'));
        tracing::debug!(%url, slug, "Fetching form schema");

        let resp = self
            .http
            .get(&url)
            .query(&[("slug", slug)])
            .send()
            .await
            .context("Failed to send form load request to schema host")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SchemaError::HostStatus {
                status: status.as_u16(),
            });
        }

        let payload: RawFormPayload = resp
            .json()
            .await
            .context("Failed to parse form load response from schema host")?;

        validate(payload)
    }
}
