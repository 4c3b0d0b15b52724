//! Crawler module for page fetching and field extraction
//!
//! This module contains the core crawling logic:
//! - HTTP fetching of markup and image bytes
//! - Field extraction from comic page markup
//! - The sequential crawl-and-resume loop

mod coordinator;
mod extractor;
mod fetcher;

pub use coordinator::{crawl, Crawler, PageReport};
pub use extractor::{
    extract, normalize_whitespace, ExtractOptions, PageContent, SelectorSpec, COMIC_REGION,
    ENTRY_REGION, NEXT_LINK,
};
pub use fetcher::{build_http_client, fetch_image_bytes, fetch_markup};
