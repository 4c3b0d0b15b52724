//! Document rendering module
//!
//! Turns one crawled page's normalized images and extracted text into a
//! single finalized PDF artifact.

mod builder;
mod layout;

pub use builder::DocumentBuilder;
pub use layout::{layout_text, FontAssets, TextLayout};

#[cfg(test)]
pub(crate) mod test_support {
    use super::FontAssets;
    use std::path::Path;

    /// Loads the font fixture shared by document tests
    pub fn test_fonts() -> FontAssets {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
        FontAssets::load(&path).expect("test font fixture should load")
    }
}
