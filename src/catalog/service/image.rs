use super::HttpClient;
use crate::catalog::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Fetches raw image bytes
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn request_image(&self, url: &str) -> Result<Vec<u8>>;
}

/// Image service that downloads straight from the image CDN
#[derive(Debug, Clone)]
pub struct HttpImageService {
    client: HttpClient,
}

impl HttpImageService {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new("", timeout)?,
        })
    }
}

#[async_trait]
impl ImageService for HttpImageService {
    async fn request_image(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading image: {}", url);
        self.client.get_bytes(url).await
    }
}
