use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// In-memory cache of downloaded image bytes, keyed by URL
#[derive(Clone)]
pub struct ImageCache {
    images: Cache<String, Arc<Vec<u8>>>,
}

impl ImageCache {
    /// Create a new cache with default settings
    pub fn new() -> Self {
        Self::with_config(ImageCacheConfig::default())
    }

    /// Create a new cache with custom configuration
    pub fn with_config(config: ImageCacheConfig) -> Self {
        let images = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();

        Self { images }
    }

    /// Get cached image bytes
    pub async fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.images.get(url).await.map(|arc| (*arc).clone())
    }

    /// Cache image bytes
    pub async fn insert(&self, url: &str, bytes: Vec<u8>) {
        self.images.insert(url.to_string(), Arc::new(bytes)).await;
    }

    /// Approximate number of cached images
    pub fn entry_count(&self) -> u64 {
        self.images.entry_count()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entry_count())
            .finish()
    }
}

/// Image cache configuration
#[derive(Debug, Clone)]
pub struct ImageCacheConfig {
    /// Maximum number of cached images
    pub max_entries: u64,
    /// TTL for cached images
    pub ttl: Duration,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 200,
            ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}
