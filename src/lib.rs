//! Panelbound: a sequential webcomic archiver
//!
//! This crate walks a webcomic site one page at a time, extracts each page's
//! comic images, hover text, and story prose, and renders every page into a
//! standalone PDF. Crawl position is persisted after each completed page, so
//! an interrupted run resumes exactly where it left off.

pub mod config;
pub mod crawler;
pub mod document;
pub mod imaging;
pub mod state;

use thiserror::Error;

/// Main error type for Panelbound operations
#[derive(Debug, Error)]
pub enum PanelboundError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Expected page region not found: {selector}")]
    Structure { selector: String },

    #[error("Failed to decode image from {url}: {source}")]
    ImageDecode {
        url: String,
        source: image::ImageError,
    },

    #[error("Image optimizer error: {message}")]
    Optimizer { message: String },

    #[error("Corrupt progress record {line:?}: {reason}")]
    StateCorruption { line: String, reason: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("Invalid font file {path}: {message}")]
    InvalidFont { path: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// Result type alias for Panelbound operations
pub type Result<T> = std::result::Result<T, PanelboundError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{extract, Crawler, PageContent, PageReport};
pub use state::{CrawlPosition, ProgressStore};
