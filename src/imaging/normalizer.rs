//! Image normalization
//!
//! Every fetched image is brought into the canonical raster format (PNG)
//! before rendering. When the external size optimizer is enabled, the
//! canonical bytes are shrunk through it and the shrunken result is used
//! instead; an optimizer failure is then fatal for the current image. That
//! is deliberate: the switch was explicitly enabled for storage cost, so
//! silently falling back to unoptimized bytes would defeat the point.

use crate::config::OptimizerConfig;
use crate::imaging::optimizer;
use crate::{PanelboundError, Result};
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use std::io::Cursor;

/// Image bytes guaranteed to be canonical-format PNG, with the decoded
/// raster alongside for dimension and pixel access
#[derive(Debug)]
pub struct NormalizedImage {
    bytes: Vec<u8>,
    image: DynamicImage,
}

impl NormalizedImage {
    /// Canonical PNG bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel width
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Pixel height
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consumes self, yielding the decoded raster
    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    #[cfg(test)]
    pub(crate) fn from_parts(bytes: Vec<u8>, image: DynamicImage) -> Self {
        NormalizedImage { bytes, image }
    }
}

/// Normalizes raw fetched bytes into canonical PNG
///
/// Already-PNG input passes through byte-identical (when the optimizer is
/// disabled); other formats are decoded and re-encoded. Corrupt or
/// unrecognized data is an `ImageDecode` error.
///
/// # Arguments
///
/// * `client` - HTTP client used for the optimizer service, if enabled
/// * `raw` - The fetched image bytes
/// * `source_url` - Where the bytes came from, for error context
/// * `config` - Optimizer switch and credentials
pub async fn normalize(
    client: &Client,
    raw: Vec<u8>,
    source_url: &str,
    config: &OptimizerConfig,
) -> Result<NormalizedImage> {
    let format = image::guess_format(&raw).map_err(|source| PanelboundError::ImageDecode {
        url: source_url.to_string(),
        source,
    })?;

    let decoded =
        image::load_from_memory(&raw).map_err(|source| PanelboundError::ImageDecode {
            url: source_url.to_string(),
            source,
        })?;

    let bytes = if format == ImageFormat::Png {
        raw
    } else {
        tracing::debug!("Re-encoding {:?} image to PNG: {}", format, source_url);
        encode_png(&decoded, source_url)?
    };

    if !config.enabled {
        return Ok(NormalizedImage {
            bytes,
            image: decoded,
        });
    }

    let optimized = optimizer::shrink(client, config, &bytes).await?;
    let image =
        image::load_from_memory(&optimized).map_err(|source| PanelboundError::ImageDecode {
            url: source_url.to_string(),
            source,
        })?;

    Ok(NormalizedImage {
        bytes: optimized,
        image,
    })
}

fn encode_png(image: &DynamicImage, source_url: &str) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|source| PanelboundError::ImageDecode {
            url: source_url.to_string(),
            source,
        })?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::build_http_client;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_png_passes_through_unchanged() {
        let client = build_http_client().unwrap();
        let raw = png_bytes(3, 2);

        let normalized = normalize(&client, raw.clone(), "/a.png", &OptimizerConfig::default())
            .await
            .unwrap();

        assert_eq!(normalized.bytes(), raw.as_slice());
        assert_eq!(normalized.width(), 3);
        assert_eq!(normalized.height(), 2);
    }

    #[tokio::test]
    async fn test_jpeg_reencoded_to_png() {
        let client = build_http_client().unwrap();
        let raw = jpeg_bytes(5, 4);

        let normalized = normalize(&client, raw, "/a.jpg", &OptimizerConfig::default())
            .await
            .unwrap();

        assert_eq!(
            image::guess_format(normalized.bytes()).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(normalized.width(), 5);
        assert_eq!(normalized.height(), 4);
    }

    #[tokio::test]
    async fn test_corrupt_bytes_are_decode_error() {
        let client = build_http_client().unwrap();
        let raw = b"definitely not an image".to_vec();

        let result = normalize(&client, raw, "/bad", &OptimizerConfig::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            PanelboundError::ImageDecode { .. }
        ));
    }

    #[tokio::test]
    async fn test_truncated_png_is_decode_error() {
        let client = build_http_client().unwrap();
        let mut raw = png_bytes(3, 3);
        raw.truncate(16); // valid signature, broken body

        let result = normalize(&client, raw, "/trunc.png", &OptimizerConfig::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            PanelboundError::ImageDecode { .. }
        ));
    }
}
