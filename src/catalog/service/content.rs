use super::{ContentRoute, ContentService, HttpClient, MAX_PAGE, MIN_PAGE, ServiceConfig};
use crate::catalog::{CatalogError, Result};
use async_trait::async_trait;
use tracing::debug;

/// Content service backed by the remote REST catalog
#[derive(Debug, Clone)]
pub struct HttpContentService {
    client: HttpClient,
    api_key: String,
}

impl HttpContentService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config.base_url.clone(), config.timeout)?,
            api_key: config.api_key.clone(),
        })
    }

    fn params(&self, query: Option<&str>, page: Option<u32>) -> Vec<(&'static str, String)> {
        let mut params = vec![("api_key", self.api_key.clone())];

        if let Some(page) = page {
            params.push(("page", page.to_string()));
        }
        if let Some(query) = query {
            params.push(("query", query.to_string()));
        }

        params
    }
}

#[async_trait]
impl ContentService for HttpContentService {
    async fn request(
        &self,
        route: ContentRoute,
        query: Option<&str>,
        page: Option<u32>,
    ) -> Result<serde_json::Value> {
        if let Some(page) = page
            && !(MIN_PAGE..=MAX_PAGE).contains(&page)
        {
            return Err(CatalogError::InvalidPage(page));
        }

        debug!("GET {} (query: {:?}, page: {:?})", route, query, page);

        let params = self.params(query, page);
        self.client.get_json(&route.path(), &params).await
    }
}
