//! PDF document builder
//!
//! Each crawled page becomes one PDF named by its sequence number: one PDF
//! page per comic image, sized exactly to the image's pixel dimensions, then
//! one text page when any hover or story text exists. Pages are buffered and
//! the PDF is written in a single pass at finalize, so a failed page never
//! leaves a half-written artifact behind.

use crate::config::RenderConfig;
use crate::document::layout::{layout_text, FontAssets, TextLayout};
use crate::imaging::NormalizedImage;
use crate::Result;
use image::DynamicImage;
use printpdf::{
    Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Pt,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Rendering resolution at which one image pixel equals one PDF point
const POINT_DPI: f32 = 72.0;

/// Fallback page size for a document with no pages at all (a comic page
/// with no images and no text), roughly A4
const EMPTY_PAGE_SIZE_PT: (f32, f32) = (595.0, 842.0);

enum PageSpec {
    Image(DynamicImage),
    Text(TextLayout),
}

/// Builds one output PDF for a single comic page
pub struct DocumentBuilder<'a> {
    sequence: u64,
    config: &'a RenderConfig,
    fonts: &'a FontAssets,
    pages: Vec<PageSpec>,
}

impl<'a> DocumentBuilder<'a> {
    /// Opens a new document keyed by the page sequence number
    pub fn new(sequence: u64, config: &'a RenderConfig, fonts: &'a FontAssets) -> Self {
        DocumentBuilder {
            sequence,
            config,
            fonts,
            pages: Vec::new(),
        }
    }

    /// Appends one page sized to the image's pixel dimensions
    pub fn append_image_page(&mut self, image: NormalizedImage) {
        self.pages.push(PageSpec::Image(image.into_image()));
    }

    /// Appends the combined text page
    ///
    /// When both texts are empty this is a no-op; a blank text page is never
    /// emitted.
    pub fn append_text_page(&mut self, hover_text: &str, story_text: &str) {
        if hover_text.is_empty() && story_text.is_empty() {
            return;
        }

        let layout = layout_text(
            hover_text,
            story_text,
            self.fonts,
            self.config.font_size,
            self.config.wrap_width,
        );
        self.pages.push(PageSpec::Text(layout));
    }

    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Renders all buffered pages and writes `<output-dir>/<sequence>.pdf`
    ///
    /// After this call the artifact on disk is complete and never mutated.
    pub fn finalize(self) -> Result<PathBuf> {
        let path = Path::new(&self.config.output_dir).join(format!("{}.pdf", self.sequence));

        let (first_width, first_height) = self
            .pages
            .first()
            .map(page_size_pt)
            .unwrap_or(EMPTY_PAGE_SIZE_PT);

        let (doc, first_page, first_layer) = PdfDocument::new(
            self.sequence.to_string(),
            Mm::from(Pt(first_width)),
            Mm::from(Pt(first_height)),
            "Layer 1",
        );
        let font = doc.add_external_font(self.fonts.bytes())?;

        for (index, spec) in self.pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (width, height) = page_size_pt(spec);
                let (page, layer) =
                    doc.add_page(Mm::from(Pt(width)), Mm::from(Pt(height)), "Layer 1");
                doc.get_page(page).get_layer(layer)
            };

            match spec {
                PageSpec::Image(image) => render_image_page(&layer, image),
                PageSpec::Text(layout) => {
                    render_text_page(&layer, &font, layout, self.config.font_size)
                }
            }
        }

        save_document(doc, &path)?;
        tracing::debug!("Finalized document: {}", path.display());
        Ok(path)
    }
}

/// Page dimensions in points for one page spec
fn page_size_pt(spec: &PageSpec) -> (f32, f32) {
    match spec {
        PageSpec::Image(image) => (image.width() as f32, image.height() as f32),
        PageSpec::Text(layout) => (layout.width_pt, layout.height_pt),
    }
}

/// Places the image at the page origin, filling the page
///
/// At 72 dpi one pixel maps to one point, so an image page shows the comic
/// at its native resolution.
fn render_image_page(layer: &PdfLayerReference, image: &DynamicImage) {
    // Flatten any alpha channel; PDF image XObjects carry opaque raster data
    let flattened = DynamicImage::ImageRgb8(image.to_rgb8());
    let pdf_image = Image::from_dynamic_image(&flattened);
    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            dpi: Some(POINT_DPI),
            ..Default::default()
        },
    );
}

/// Draws the text lines bottom-up so reading order runs top-to-bottom
fn render_text_page(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    layout: &TextLayout,
    font_size: f32,
) {
    let pad = font_size / 2.0;
    let line_count = layout.lines.len();

    for (index, line) in layout.lines.iter().enumerate() {
        let baseline = (line_count - 1 - index) as f32 * font_size + pad;
        layer.use_text(
            line.clone(),
            font_size,
            Mm::from(Pt(pad)),
            Mm::from(Pt(baseline)),
            font,
        );
    }
}

fn save_document(doc: PdfDocumentReference, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_support::test_fonts;
    use crate::imaging::NormalizedImage;
    use tempfile::TempDir;

    fn render_config(dir: &TempDir) -> RenderConfig {
        RenderConfig {
            output_dir: dir.path().to_str().unwrap().to_string(),
            font_path: String::new(),
            font_size: 12.0,
            wrap_width: 120,
        }
    }

    fn test_image(width: u32, height: u32) -> NormalizedImage {
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        NormalizedImage::from_parts(Vec::new(), image)
    }

    #[test]
    fn test_document_named_by_sequence() {
        let dir = TempDir::new().unwrap();
        let config = render_config(&dir);
        let fonts = test_fonts();

        let mut builder = DocumentBuilder::new(7, &config, &fonts);
        builder.append_text_page("hover", "");
        let path = builder.finalize().unwrap();

        assert_eq!(path, dir.path().join("7.pdf"));
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_page_count_images_then_text() {
        let dir = TempDir::new().unwrap();
        let config = render_config(&dir);
        let fonts = test_fonts();

        let mut builder = DocumentBuilder::new(1, &config, &fonts);
        builder.append_image_page(test_image(4, 4));
        builder.append_image_page(test_image(8, 2));
        builder.append_text_page("Cat Dog", "Hello World");

        assert_eq!(builder.page_count(), 3);
        builder.finalize().unwrap();
    }

    #[test]
    fn test_empty_text_page_not_emitted() {
        let dir = TempDir::new().unwrap();
        let config = render_config(&dir);
        let fonts = test_fonts();

        let mut builder = DocumentBuilder::new(1, &config, &fonts);
        builder.append_image_page(test_image(4, 4));
        builder.append_text_page("", "");

        assert_eq!(builder.page_count(), 1);
    }

    #[test]
    fn test_image_page_sized_to_pixels() {
        let spec = PageSpec::Image(DynamicImage::ImageRgb8(image::RgbImage::new(120, 48)));
        assert_eq!(page_size_pt(&spec), (120.0, 48.0));
    }

    #[test]
    fn test_pageless_document_still_finalizes() {
        // A page with no images and no text still completes its iteration
        let dir = TempDir::new().unwrap();
        let config = render_config(&dir);
        let fonts = test_fonts();

        let builder = DocumentBuilder::new(3, &config, &fonts);
        let path = builder.finalize().unwrap();
        assert!(path.exists());
    }
}
