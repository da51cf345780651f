//! Layered settings: built-in defaults, then an optional TOML file, then
//! `POPULAR_MOVIES__*` environment variables (e.g. `POPULAR_MOVIES__API__API_KEY`).

use crate::catalog::{CatalogError, ImageCacheConfig, Result, ServiceConfig};
use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const FILE_NAME: &str = "popular-movies.toml";
const CONFIG_DIR_NAME: &str = "popular-movies";
const CONFIG_DIR_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "POPULAR_MOVIES";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub images: ImageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSettings {
    /// Physical pixels per logical unit of the display
    pub pixel_density: f64,
    pub cache_max_entries: u64,
    pub cache_ttl_secs: u64,
}

impl Settings {
    /// Load settings from the default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings, reading `path` instead of the default file locations when given
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("api.base_url", "https://api.themoviedb.org/3")
            .and_then(|b| b.set_default("api.api_key", ""))
            .and_then(|b| b.set_default("api.timeout_secs", 30))
            .and_then(|b| b.set_default("images.pixel_density", 2.0))
            .and_then(|b| b.set_default("images.cache_max_entries", 200))
            .and_then(|b| b.set_default("images.cache_ttl_secs", 3600))
            .map_err(config_error)?;

        match path {
            Some(path) => builder = builder.add_source(File::from(path).required(true)),
            None => {
                for candidate in Self::default_files() {
                    builder = builder.add_source(File::from(candidate).required(false));
                }
            }
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(config_error)
    }

    /// User config dir first so a file in the working directory overrides it
    fn default_files() -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            files.push(dir.join(CONFIG_DIR_NAME).join(CONFIG_DIR_FILE));
        }
        files.push(PathBuf::from(FILE_NAME));
        files
    }

    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new(self.api.base_url.clone(), self.api.api_key.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    #[must_use]
    pub fn image_cache_config(&self) -> ImageCacheConfig {
        ImageCacheConfig {
            max_entries: self.images.cache_max_entries,
            ttl: Duration::from_secs(self.images.cache_ttl_secs),
        }
    }
}

fn config_error(e: ::config::ConfigError) -> CatalogError {
    CatalogError::Config(e.to_string())
}
