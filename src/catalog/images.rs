use crate::catalog::{
    cache::ImageCache,
    service::{ConfigurationResponse, ContentRoute, ContentService, ImageService, decode},
    types::Configuration,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
enum ImageKind {
    Poster,
    Backdrop,
}

/// Resolves relative image paths into bytes at a suitable resolution.
///
/// Nothing resolves until [`ImagesRepository::load_configuration`] has succeeded;
/// until then every image call yields `None` without touching the network.
#[derive(Clone)]
pub struct ImagesRepository {
    content: Arc<dyn ContentService>,
    images: Arc<dyn ImageService>,
    cache: ImageCache,
    pixel_density: f64,
    configuration: Arc<RwLock<Option<Configuration>>>,
}

impl ImagesRepository {
    pub fn new(
        content: Arc<dyn ContentService>,
        images: Arc<dyn ImageService>,
        cache: ImageCache,
        pixel_density: f64,
    ) -> Self {
        Self {
            content,
            images,
            cache,
            pixel_density,
            configuration: Arc::new(RwLock::new(None)),
        }
    }

    /// The loaded configuration, if any
    pub fn configuration(&self) -> Option<Configuration> {
        self.configuration.read().clone()
    }

    /// Fetch the image configuration.
    ///
    /// Once loaded it is kept for the lifetime of the repository and later calls
    /// return immediately. A failed fetch is logged and may be retried.
    pub async fn load_configuration(&self) {
        if self.configuration.read().is_some() {
            debug!("Image configuration already loaded");
            return;
        }

        let response = self
            .content
            .request_route(ContentRoute::Configuration)
            .await
            .and_then(decode::<ConfigurationResponse>);

        match response {
            Ok(response) => {
                let configuration = Configuration::from_response(response);
                if configuration.is_usable() {
                    info!(
                        "Loaded image configuration (base: {:?})",
                        configuration.base_image_url
                    );
                    *self.configuration.write() = Some(configuration);
                } else {
                    warn!("Image configuration has no base URL");
                }
            }
            Err(e) => warn!("Failed to load image configuration: {}", e),
        }
    }

    /// URL of a poster at a bucket suited to `width` logical units
    pub fn poster_url(&self, path: Option<&str>, width: u32) -> Option<String> {
        self.image_url(ImageKind::Poster, path, width)
    }

    /// URL of a backdrop at a bucket suited to `width` logical units
    pub fn backdrop_url(&self, path: Option<&str>, width: u32) -> Option<String> {
        self.image_url(ImageKind::Backdrop, path, width)
    }

    pub async fn load_poster_image(&self, path: Option<&str>, width: u32) -> Option<Vec<u8>> {
        let url = self.poster_url(path, width)?;
        self.load_image(&url).await
    }

    pub async fn load_backdrop_image(&self, path: Option<&str>, width: u32) -> Option<Vec<u8>> {
        let url = self.backdrop_url(path, width)?;
        self.load_image(&url).await
    }

    fn image_url(&self, kind: ImageKind, path: Option<&str>, width: u32) -> Option<String> {
        let path = path?;
        let guard = self.configuration.read();
        let configuration = guard.as_ref()?;

        let sizes = match kind {
            ImageKind::Poster => configuration.poster_sizes.as_deref(),
            ImageKind::Backdrop => configuration.backdrop_sizes.as_deref(),
        }?;

        let target = self.target_pixels(width);
        let bucket = Configuration::select_bucket(sizes, target);
        configuration.image_url(bucket, path)
    }

    fn target_pixels(&self, width: u32) -> u32 {
        // Saturating float-to-int cast
        (f64::from(width) * self.pixel_density) as u32
    }

    async fn load_image(&self, url: &str) -> Option<Vec<u8>> {
        if let Some(bytes) = self.cache.get(url).await {
            debug!("Cache hit for image: {}", url);
            return Some(bytes);
        }

        match self.images.request_image(url).await {
            Ok(bytes) => {
                self.cache.insert(url, bytes.clone()).await;
                Some(bytes)
            }
            Err(e) => {
                warn!("Failed to load image {}: {}", url, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for ImagesRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagesRepository")
            .field("pixel_density", &self.pixel_density)
            .field("configuration", &*self.configuration.read())
            .field("cache", &self.cache)
            .finish()
    }
}
