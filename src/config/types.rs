use serde::Deserialize;

/// Main configuration structure for Panelbound
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub state: StateConfig,
    pub render: RenderConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// First page of the comic, used when no crawl position has been saved yet
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Whether a page missing the story ("entry") region is a structural error.
    /// Some comics genuinely omit the prose block on certain pages; set this
    /// to false to treat absence as an empty story instead.
    #[serde(rename = "require-entry", default = "default_require_entry")]
    pub require_entry: bool,
}

/// Progress store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Path to the append-only progress file
    pub path: String,
}

/// Document rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Directory that receives one `<sequence>.pdf` per crawled page
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Path to the TTF font registered into the PDF renderer at startup
    #[serde(rename = "font-path")]
    pub font_path: String,

    /// Point size used for all rendered text
    #[serde(rename = "font-size", default = "default_font_size")]
    pub font_size: f32,

    /// Maximum characters per wrapped text line
    #[serde(rename = "wrap-width", default = "default_wrap_width")]
    pub wrap_width: usize,
}

/// External image size-optimization service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    /// When true, every normalized image is submitted to the shrink API and
    /// its result is used. Failure of the service is then fatal for the
    /// current image; there is no fallback to the unoptimized bytes.
    #[serde(default)]
    pub enabled: bool,

    /// API key, required when enabled
    #[serde(rename = "api-key", default)]
    pub api_key: String,

    /// Shrink endpoint URL
    #[serde(default = "default_optimizer_endpoint")]
    pub endpoint: String,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            enabled: false,
            api_key: String::new(),
            endpoint: default_optimizer_endpoint(),
        }
    }
}

fn default_require_entry() -> bool {
    true
}

fn default_font_size() -> f32 {
    12.0
}

fn default_wrap_width() -> usize {
    120
}

fn default_optimizer_endpoint() -> String {
    "https://api.tinify.com/shrink".to_string()
}
