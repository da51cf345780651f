use crate::catalog::{CatalogError, Result};
use reqwest::Client;
use std::time::Duration;

/// HTTP client wrapper shared by the catalog services
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("PopularMovies/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build full URL from endpoint
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Execute GET request with query parameters and parse the JSON object it returns
    pub async fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value> {
        let url = self.url(endpoint);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(CatalogError::Network)?;

        let response = Self::check_status(response).await?;
        let value = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| CatalogError::Parse(format!("JSON parse error: {e}")))?;

        if !value.is_object() {
            return Err(CatalogError::Parse(format!(
                "Expected a JSON object from {endpoint}"
            )));
        }

        Ok(value)
    }

    /// Execute GET request against an absolute URL and return the raw body
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(CatalogError::Network)?;

        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(CatalogError::Network)?;

        Ok(bytes.to_vec())
    }

    /// Turn a non-2xx response into an API error
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();

            return Err(CatalogError::Api {
                status: status_code,
                message,
            });
        }

        Ok(response)
    }
}
