//! Wire types for the catalog REST payloads.
//!
//! Every field is optional and decoded leniently: a key with an unexpected JSON
//! type decodes as `None` instead of rejecting the whole record.

use crate::catalog::{CatalogError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Decode a JSON payload into one of the wire types
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| CatalogError::Parse(e.to_string()))
}

// Paginated list responses
#[derive(Debug, Default, Deserialize)]
pub struct PageResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_results: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_pages: Option<u32>,
    /// Raw entries, decoded one by one so a single bad entry can be skipped
    #[serde(default, deserialize_with = "lenient")]
    pub results: Option<Vec<serde_json::Value>>,
}

/// A movie as returned by list, search and detail endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub budget: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub revenue: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub vote_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub adult: Option<bool>,
    /// Inline genres, detail endpoint only
    #[serde(default, deserialize_with = "lenient")]
    pub genres: Option<Vec<GenreRecord>>,
    /// Genre ids, list and search endpoints only
    #[serde(default, deserialize_with = "lenient")]
    pub genre_ids: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub spoken_languages: Option<Vec<LanguageRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

// Reference data
#[derive(Debug, Default, Deserialize)]
pub struct GenreListResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub genres: Option<Vec<GenreRecord>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigurationResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub images: Option<ImagesConfiguration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesConfiguration {
    #[serde(default, deserialize_with = "lenient")]
    pub secure_base_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_sizes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_sizes: Option<Vec<String>>,
}
