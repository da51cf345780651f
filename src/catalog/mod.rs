mod cache;
mod dispatch;
mod images;
mod movies;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use cache::{ImageCache, ImageCacheConfig};
pub use dispatch::{Dispatcher, TokioDispatcher};
pub use images::ImagesRepository;
pub use movies::{MoviesEvent, MoviesRepository};
pub use service::{
    ContentRoute, ContentService, HttpClient, HttpContentService, HttpImageService,
    ImageService, ServiceConfig, MAX_PAGE, MIN_PAGE,
};
pub use types::{Configuration, Genre, GenreTable, Movie, ORIGINAL_BUCKET};

/// Catalog result type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid page: {0} (expected 1..=1000)")]
    InvalidPage(u32),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
