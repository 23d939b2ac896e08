//! Good Spots: a restaurant listing harvester
//!
//! This crate walks a restaurant-review site's sitemap hierarchy
//! (city → area → restaurant), captures each restaurant page and extracts a
//! fixed-shape metadata record from it.

pub mod config;
pub mod crawler;
pub mod output;
pub mod restaurant;
pub mod url;

use thiserror::Error;

/// Main error type for harvesting operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("URL format error: {0}")]
    UrlFormat(#[from] UrlFormatError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// A page could not be retrieved
#[derive(Debug, Error)]
#[error("Failed to fetch {url}: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: FetchFailure,
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: FetchFailure) -> Self {
        Self {
            url: url.into(),
            cause,
        }
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self.cause {
            FetchFailure::Status(code) => Some(code),
            _ => None,
        }
    }
}

/// Page content could not be interpreted
///
/// Field extraction never surfaces these to callers; they are logged and the
/// field keeps its empty value.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed structured data: {0}")]
    StructuredData(#[from] serde_json::Error),

    #[error("Unexpected HTML shape: {0}")]
    UnexpectedShape(String),

    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A URL did not have the path shape a sitemap level expects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlFormatError {
    #[error("Restaurant URL {url} does not match /<city>/<area>/<sub-area>/<id>/")]
    RestaurantPath { url: String },

    #[error("Area URL {url} does not match /sitemap/<city>/<area-code>/")]
    AreaPath { url: String },

    #[error("Invalid city slug: {0:?}")]
    CitySlug(String),
}

/// Result type alias for harvesting operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{AreaEntry, AreaHarvest, Harvester, RestaurantLink};
pub use restaurant::{parse_restaurant_page, RestaurantRecord};
pub use crate::url::{FileNamer, UrlTriple, UrlTripleNamer};
