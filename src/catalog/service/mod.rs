mod api_types;
mod content;
mod http;
mod image;

pub(crate) use api_types::{
    ConfigurationResponse, GenreListResponse, MovieRecord, PageResponse, decode,
};
pub use content::HttpContentService;
pub use http::HttpClient;
pub use image::{HttpImageService, ImageService};

use crate::catalog::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Lowest page number the remote catalog accepts
pub const MIN_PAGE: u32 = 1;
/// Highest page number the remote catalog accepts
pub const MAX_PAGE: u32 = 1000;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Endpoint selector for the content service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRoute {
    Configuration,
    PopularMovies,
    SearchMovies,
    MovieGenres,
    Movie { id: i64 },
}

impl ContentRoute {
    /// Path of the endpoint, relative to the service base URL
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Configuration => "/configuration".to_string(),
            Self::PopularMovies => "/movie/popular".to_string(),
            Self::SearchMovies => "/search/movie".to_string(),
            Self::MovieGenres => "/genre/movie/list".to_string(),
            Self::Movie { id } => format!("/movie/{id}"),
        }
    }
}

impl fmt::Display for ContentRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Connection settings for the content service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL every route is appended to
    pub base_url: String,
    /// API key sent with every request
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "")
    }
}

/// Parameterized access to the remote content catalog
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Issue a GET against `route` and return the JSON object it answers with.
    ///
    /// A `page` outside `MIN_PAGE..=MAX_PAGE` fails with
    /// [`CatalogError::InvalidPage`](crate::catalog::CatalogError::InvalidPage)
    /// without touching the network.
    async fn request(
        &self,
        route: ContentRoute,
        query: Option<&str>,
        page: Option<u32>,
    ) -> Result<serde_json::Value>;

    async fn request_route(&self, route: ContentRoute) -> Result<serde_json::Value> {
        self.request(route, None, None).await
    }

    async fn request_page(&self, route: ContentRoute, page: u32) -> Result<serde_json::Value> {
        self.request(route, None, Some(page)).await
    }

    async fn request_query(&self, route: ContentRoute, query: &str) -> Result<serde_json::Value> {
        self.request(route, Some(query), None).await
    }
}
