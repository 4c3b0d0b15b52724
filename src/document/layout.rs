//! Text measurement and page layout math
//!
//! The text page is sized from its content rather than a fixed paper size:
//! width follows the widest rendered line, height follows the line count.
//! Measurement uses the same font file that gets embedded into the PDF, so
//! measured widths match what the renderer draws.

use crate::{PanelboundError, Result};
use ab_glyph::{Font, FontArc};
use std::path::Path;

/// Horizontal page margin in multiples of the font size
const WIDTH_MARGIN_FACTOR: f32 = 3.0;

/// The font registered into the document renderer at startup
///
/// Holds both the raw TTF bytes (embedded into each PDF) and the parsed
/// face used for width measurement.
#[derive(Debug)]
pub struct FontAssets {
    bytes: Vec<u8>,
    font: FontArc,
}

impl FontAssets {
    /// Loads a TTF font from disk
    ///
    /// A missing or unparseable font file is a fatal startup error; nothing
    /// can be rendered without it.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| PanelboundError::InvalidFont {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let font =
            FontArc::try_from_vec(bytes.clone()).map_err(|e| PanelboundError::InvalidFont {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(FontAssets { bytes, font })
    }

    /// Raw TTF bytes for embedding
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Typographic width of `text` in points at the given point size
    pub fn string_width(&self, text: &str, font_size: f32) -> f32 {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        let advance: f32 = text
            .chars()
            .map(|c| self.font.h_advance_unscaled(self.font.glyph_id(c)))
            .sum();
        advance * font_size / units_per_em
    }
}

/// A fully laid-out text page
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Wrapped lines in reading order, first line at the top of the page
    pub lines: Vec<String>,

    /// Page width in points: widest measured line plus horizontal margin
    pub width_pt: f32,

    /// Page height in points: one font size per line plus half a font size
    pub height_pt: f32,
}

/// Wraps hover and story text and computes the page dimensions
///
/// The content is the wrapped hover lines, then (when the story is
/// non-empty) one blank line and the wrapped story lines.
pub fn layout_text(
    hover_text: &str,
    story_text: &str,
    fonts: &FontAssets,
    font_size: f32,
    wrap_width: usize,
) -> TextLayout {
    let mut lines = wrap_block(hover_text, wrap_width);
    if !story_text.is_empty() {
        lines.push(String::new());
        lines.extend(wrap_block(story_text, wrap_width));
    }

    let widest = lines
        .iter()
        .map(|line| fonts.string_width(line, font_size))
        .fold(0.0_f32, f32::max);

    let width_pt = widest + font_size * WIDTH_MARGIN_FACTOR;
    let height_pt = lines.len() as f32 * font_size + font_size / 2.0;

    TextLayout {
        lines,
        width_pt,
        height_pt,
    }
}

/// Word-wraps one block of text; empty input yields no lines at all
fn wrap_block(text: &str, wrap_width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    textwrap::wrap(text, wrap_width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}
