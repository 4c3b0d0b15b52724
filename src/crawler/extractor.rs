//! Field extractor for comic pages
//!
//! Given one page's markup, this module locates the comic region, collects
//! the comic image sources and their hover captions, gathers the story prose
//! from the entry region, and finds the next-page navigation link.
//!
//! The page layout is addressed through a static table of
//! (element, attribute, value) selector triples. When the site changes its
//! markup, that table is the single place to edit.

use crate::{PanelboundError, Result};
use scraper::{ElementRef, Html, Selector};

/// One entry in the selector table: match `element` nodes whose `attribute`
/// equals `value`
#[derive(Debug, Clone, Copy)]
pub struct SelectorSpec {
    pub element: &'static str,
    pub attribute: &'static str,
    pub value: &'static str,
}

/// Container holding the comic images
pub const COMIC_REGION: SelectorSpec = SelectorSpec {
    element: "div",
    attribute: "id",
    value: "comic",
};

/// Container holding the story prose paragraphs
pub const ENTRY_REGION: SelectorSpec = SelectorSpec {
    element: "div",
    attribute: "class",
    value: "entry",
};

/// Navigation link to the next page in the sequence
pub const NEXT_LINK: SelectorSpec = SelectorSpec {
    element: "a",
    attribute: "class",
    value: "navi comic-nav-next navi-next",
};

/// Image sources on this host are dropped entirely. The site occasionally
/// embeds third-party mirrors here that 404 or redirect to HTML; a standing
/// site-specific workaround, not general policy.
const EXCLUDED_IMAGE_HOST: &str = "imgur";

impl SelectorSpec {
    /// Builds a scraper CSS selector for this spec
    ///
    /// Class attributes are matched per class token so that the order of
    /// classes in the markup does not matter; other attributes are matched
    /// exactly.
    fn to_selector(&self) -> Result<Selector> {
        let css = if self.attribute == "class" {
            let classes: String = self
                .value
                .split_whitespace()
                .map(|class| format!(".{}", class))
                .collect();
            format!("{}{}", self.element, classes)
        } else {
            format!("{}[{}=\"{}\"]", self.element, self.attribute, self.value)
        };

        Selector::parse(&css).map_err(|_| PanelboundError::Structure {
            selector: css.clone(),
        })
    }

    fn structure_error(&self) -> PanelboundError {
        PanelboundError::Structure {
            selector: format!("{}[{}={}]", self.element, self.attribute, self.value),
        }
    }
}

/// Extraction behavior switches
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether a missing entry region is a structural error. When false,
    /// absence yields an empty story text instead.
    pub require_entry: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions { require_entry: true }
    }
}

/// Everything extracted from one comic page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Comic image sources in document order, exactly as written in the
    /// markup (no URL resolution happens here)
    pub images: Vec<String>,

    /// All image alt captions joined by single spaces, whitespace-normalized
    pub hover_text: String,

    /// Entry-region paragraph text, whitespace-normalized; may be empty
    pub story_text: String,

    /// `href` of the next-page link; `None` means this is the last page
    pub next_url: Option<String>,
}

/// Extracts images, hover text, story text, and the next link from markup
///
/// # Arguments
///
/// * `markup` - Raw page HTML
/// * `options` - Extraction behavior switches
///
/// # Returns
///
/// * `Ok(PageContent)` - Successfully extracted fields
/// * `Err(PanelboundError::Structure)` - A required page region is missing,
///   meaning the site layout changed or the URL is wrong
pub fn extract(markup: &str, options: &ExtractOptions) -> Result<PageContent> {
    let document = Html::parse_document(markup);

    let comic = document
        .select(&COMIC_REGION.to_selector()?)
        .next()
        .ok_or_else(|| COMIC_REGION.structure_error())?;

    let (images, hover_text) = extract_comic_images(&comic)?;
    let story_text = extract_story_text(&document, options)?;
    let next_url = extract_next_url(&document)?;

    Ok(PageContent {
        images,
        hover_text,
        story_text,
        next_url,
    })
}

/// Collects image sources and hover captions from the comic region
///
/// Sources come from `src` attributes in document order; elements without a
/// `src` are skipped and the excluded host is dropped. Every element with an
/// `alt` contributes one hover token regardless of whether its source
/// survived.
fn extract_comic_images(comic: &ElementRef) -> Result<(Vec<String>, String)> {
    let img_selector = Selector::parse("img").map_err(|_| PanelboundError::Structure {
        selector: "img".to_string(),
    })?;

    let mut images = Vec::new();
    let mut hover_tokens = Vec::new();

    for element in comic.select(&img_selector) {
        if let Some(src) = element.value().attr("src") {
            if !src.is_empty() && !src.contains(EXCLUDED_IMAGE_HOST) {
                images.push(fix_known_source_artifacts(src));
            }
        }

        if let Some(alt) = element.value().attr("alt") {
            if !alt.is_empty() {
                hover_tokens.push(alt);
            }
        }
    }

    let hover_text = normalize_whitespace(&hover_tokens.join(" "));
    Ok((images, hover_text))
}

/// Concatenates the text of every paragraph within the entry region
fn extract_story_text(document: &Html, options: &ExtractOptions) -> Result<String> {
    let entry = match document.select(&ENTRY_REGION.to_selector()?).next() {
        Some(entry) => entry,
        None if options.require_entry => return Err(ENTRY_REGION.structure_error()),
        None => return Ok(String::new()),
    };

    let p_selector = Selector::parse("p").map_err(|_| PanelboundError::Structure {
        selector: "p".to_string(),
    })?;

    let mut story = String::new();
    for paragraph in entry.select(&p_selector) {
        for text in paragraph.text() {
            story.push_str(text);
        }
        story.push(' ');
    }

    Ok(normalize_whitespace(&story))
}

/// Finds the next-page link; absence signals end-of-sequence
fn extract_next_url(document: &Html) -> Result<Option<String>> {
    let next = document
        .select(&NEXT_LINK.to_selector()?)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(|href| href.to_string());

    Ok(next)
}

/// Known-issue correction for image source strings
///
/// The site has a handful of pages whose `src` contains a raw U+0010 control
/// character where the percent-encoded form belongs. This is a standing
/// workaround for exactly that breakage; do not generalize it into URL
/// escaping.
fn fix_known_source_artifacts(src: &str) -> String {
    src.replace('\u{10}', "%10")
}

/// Collapses newlines and runs of spaces down to single spaces
///
/// Applied to hover and story text alike. Runs to a fixed point, so
/// normalizing already-normalized text is a no-op.
pub fn normalize_whitespace(text: &str) -> String {
    let mut text = text.replace('\n', " ");
    while text.contains("  ") {
        text = text.replace("  ", " ");
    }
    text.trim().to_string()
}
