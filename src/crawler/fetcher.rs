//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client
//! - GET requests for page markup (decoded as UTF-8 text)
//! - GET requests for raw image bytes
//!
//! Errors are never retried here; the crawl is a human-supervised batch job
//! and every failure aborts the run at the last completed page.

use crate::{PanelboundError, Result};
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all fetches in a run
///
/// The upstream site has no robots or rate concerns for a one-page-at-a-time
/// walk, but network calls still get bounded timeouts so a dead connection
/// fails the run instead of hanging it forever.
pub fn build_http_client() -> Result<Client> {
    let user_agent = format!("panelbound/{}", env!("CARGO_PKG_VERSION"));

    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a page and returns its body as UTF-8 text
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Absolute URL of the page
///
/// # Returns
///
/// * `Ok(String)` - The decoded page markup
/// * `Err(PanelboundError)` - Network failure, non-2xx status, or decode failure
pub async fn fetch_markup(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Fetching markup: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| PanelboundError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PanelboundError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| PanelboundError::Fetch {
        url: url.to_string(),
        source,
    })
}

/// Fetches an image and returns the raw response body
///
/// No content-type check is done here; whether the bytes are a decodable
/// image is the normalizer's call.
pub async fn fetch_image_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    tracing::debug!("Fetching image: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| PanelboundError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PanelboundError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| PanelboundError::Fetch {
            url: url.to_string(),
            source,
        })?;

    Ok(bytes.to_vec())
}
