//! Client for a remote movie catalog: paginated popular and search listings,
//! movie details, and image resolution with an in-memory image cache.

pub mod catalog;
pub mod config;
pub mod presenter;

pub use catalog::{
    CatalogError, Configuration, Genre, ImagesRepository, Movie, MoviesEvent, MoviesRepository,
    Result,
};
pub use config::Settings;

use catalog::{HttpContentService, HttpImageService, ImageCache, TokioDispatcher};
use std::sync::Arc;

/// Create the movie and image repositories wired to the remote catalog
pub fn create_repositories(settings: &Settings) -> Result<(MoviesRepository, ImagesRepository)> {
    let service_config = settings.service_config();
    let content = Arc::new(HttpContentService::new(&service_config)?);
    let images = Arc::new(HttpImageService::new(service_config.timeout)?);

    let movies = MoviesRepository::new(content.clone(), Arc::new(TokioDispatcher));
    let images = ImagesRepository::new(
        content,
        images,
        ImageCache::with_config(settings.image_cache_config()),
        settings.images.pixel_density,
    );

    Ok((movies, images))
}
