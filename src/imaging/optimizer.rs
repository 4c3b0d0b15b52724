//! External image size-optimization client
//!
//! Speaks the TinyPNG-style shrink protocol: POST the image bytes to the
//! shrink endpoint with the API key as basic auth, then download the
//! compressed result from the returned Location header. Any failure
//! surfaces as an `Optimizer` error; the caller decides nothing, since the
//! service being enabled means its output is required.

use crate::config::OptimizerConfig;
use crate::{PanelboundError, Result};
use reqwest::header::LOCATION;
use reqwest::Client;
use url::Url;

/// Submits PNG bytes to the shrink service and returns the compressed bytes
pub async fn shrink(client: &Client, config: &OptimizerConfig, bytes: &[u8]) -> Result<Vec<u8>> {
    tracing::debug!("Submitting {} bytes to optimizer", bytes.len());

    let response = client
        .post(&config.endpoint)
        .basic_auth("api", Some(&config.api_key))
        .body(bytes.to_vec())
        .send()
        .await
        .map_err(|e| PanelboundError::Optimizer {
            message: format!("shrink request failed: {}", e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PanelboundError::Optimizer {
            message: format!("shrink returned HTTP {}", status.as_u16()),
        });
    }

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| PanelboundError::Optimizer {
            message: "shrink response missing Location header".to_string(),
        })?
        .to_string();

    let download_url = resolve_location(&config.endpoint, &location)?;

    let download = client
        .get(download_url)
        .basic_auth("api", Some(&config.api_key))
        .send()
        .await
        .map_err(|e| PanelboundError::Optimizer {
            message: format!("optimized download failed: {}", e),
        })?;

    let status = download.status();
    if !status.is_success() {
        return Err(PanelboundError::Optimizer {
            message: format!("optimized download returned HTTP {}", status.as_u16()),
        });
    }

    let optimized = download
        .bytes()
        .await
        .map_err(|e| PanelboundError::Optimizer {
            message: format!("optimized download body failed: {}", e),
        })?;

    tracing::debug!("Optimizer returned {} bytes", optimized.len());
    Ok(optimized.to_vec())
}

/// Resolves a possibly-relative Location header against the shrink endpoint
fn resolve_location(endpoint: &str, location: &str) -> Result<Url> {
    let base = Url::parse(endpoint).map_err(|e| PanelboundError::Optimizer {
        message: format!("invalid optimizer endpoint: {}", e),
    })?;
    base.join(location).map_err(|e| PanelboundError::Optimizer {
        message: format!("invalid Location header {:?}: {}", location, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::build_http_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn optimizer_config(server: &MockServer) -> OptimizerConfig {
        OptimizerConfig {
            enabled: true,
            api_key: "test-key".to_string(),
            endpoint: format!("{}/shrink", server.uri()),
        }
    }

    #[tokio::test]
    async fn test_shrink_follows_location() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shrink"))
            .respond_with(
                ResponseTemplate::new(201).insert_header("location", "/output/compressed"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/output/compressed"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tiny".as_slice()))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let result = shrink(&client, &optimizer_config(&server), b"big image")
            .await
            .unwrap();
        assert_eq!(result, b"tiny");
    }

    #[tokio::test]
    async fn test_shrink_error_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shrink"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let result = shrink(&client, &optimizer_config(&server), b"big image").await;
        assert!(matches!(
            result.unwrap_err(),
            PanelboundError::Optimizer { .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_location_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shrink"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let result = shrink(&client, &optimizer_config(&server), b"big image").await;
        assert!(matches!(
            result.unwrap_err(),
            PanelboundError::Optimizer { .. }
        ));
    }

    #[test]
    fn test_resolve_absolute_location() {
        let url = resolve_location(
            "https://api.example.com/shrink",
            "https://api.example.com/output/abc",
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/output/abc");
    }
}
