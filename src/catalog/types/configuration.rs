use crate::catalog::service::ConfigurationResponse;
use serde::{Deserialize, Serialize};

/// Bucket used when no sized bucket is wide enough
pub const ORIGINAL_BUCKET: &str = "original";

/// Image CDN configuration: base URL plus the available width buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub base_image_url: Option<String>,
    pub backdrop_sizes: Option<Vec<String>>,
    pub poster_sizes: Option<Vec<String>>,
}

impl Configuration {
    pub(crate) fn from_response(response: ConfigurationResponse) -> Self {
        let images = response.images.unwrap_or_default();

        Self {
            base_image_url: images.secure_base_url.or(images.base_url),
            backdrop_sizes: images.backdrop_sizes,
            poster_sizes: images.poster_sizes,
        }
    }

    /// Whether images can be resolved at all
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.base_image_url.is_some()
    }

    /// Pick the smallest bucket strictly wider than `target_px`.
    ///
    /// A bucket's width is the number formed by its digits (`"w342"` is 342);
    /// a bucket without digits counts as zero and never qualifies. Falls back to
    /// [`ORIGINAL_BUCKET`].
    #[must_use]
    pub fn select_bucket(sizes: &[String], target_px: u32) -> &str {
        sizes
            .iter()
            .map(|bucket| (bucket, Self::bucket_width(bucket)))
            .filter(|(_, width)| *width > u64::from(target_px))
            .min_by_key(|(_, width)| *width)
            .map_or(ORIGINAL_BUCKET, |(bucket, _)| bucket.as_str())
    }

    /// Full URL of `path` at `bucket`, if the base URL is known
    #[must_use]
    pub fn image_url(&self, bucket: &str, path: &str) -> Option<String> {
        self.base_image_url
            .as_ref()
            .map(|base| format!("{base}{bucket}{path}"))
    }

    fn bucket_width(bucket: &str) -> u64 {
        let digits: String = bucket.chars().filter(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }
}
