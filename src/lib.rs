//! Candidate-Sourcer: polite candidate profile sourcing
//!
//! This crate finds professional-network profiles matching a set of search criteria.
//! It tries an authenticated structured-API search first and falls back to scraping a
//! public search engine, returning a deduplicated list of normalized profiles.

pub mod config;
pub mod crawler;
pub mod model;
pub mod normalize;
pub mod url;

use thiserror::Error;

/// Main error type for Candidate-Sourcer operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid search criteria: {0}")]
    InvalidCriteria(String),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Rate limited by {url}")]
    RateLimited { url: String },

    #[error("Session credential rejected: {0}")]
    Unauthorized(String),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Not a profile URL: {0}")]
    NotAProfile(String),
}

/// Result type alias for Candidate-Sourcer operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{build_queries, ProfileSource, UnifiedCrawler};
pub use model::{CandidateProfile, CrawlResult, Education, Experience, SearchCriteria};
pub use crate::url::{canonical_profile_url, public_id_from_url};
