//! Crawl coordinator - the sequential crawl-and-resume loop
//!
//! One iteration handles exactly one comic page: fetch and extract, fetch
//! and normalize each image, render the PDF, then persist the next crawl
//! position. Iterations are strictly sequential with no concurrency within
//! or across pages, and there is no retry: any error aborts the run with the
//! Progress Store still pointing at the last completed page, safe to resume
//! by re-running.

use crate::config::Config;
use crate::crawler::extractor::{extract, ExtractOptions, PageContent};
use crate::crawler::fetcher::{build_http_client, fetch_image_bytes, fetch_markup};
use crate::document::{DocumentBuilder, FontAssets};
use crate::imaging::normalize;
use crate::state::{CrawlPosition, ProgressStore};
use crate::Result;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Summary of one completed page iteration
#[derive(Debug, Clone)]
pub struct PageReport {
    /// Sequence number of the completed page
    pub sequence: u64,

    /// URL the page was fetched from
    pub url: String,

    /// Extracted hover text
    pub hover_text: String,

    /// Number of comic images rendered
    pub image_count: usize,

    /// Finalized output artifact
    pub document_path: PathBuf,
}

/// Sequential crawler over one comic site
///
/// `step()` yields one `PageReport` per completed page and `None` once the
/// last page (no next link) has been processed, so the crawl reads as a
/// lazy, in-principle-infinite sequence that the caller simply stops
/// consuming. Restarting is always done through the Progress Store.
#[derive(Debug)]
pub struct Crawler {
    config: Arc<Config>,
    client: Client,
    store: ProgressStore,
    fonts: FontAssets,
    options: ExtractOptions,
    base_url: Url,
    position: CrawlPosition,
    finished: bool,
}

impl Crawler {
    /// Creates a crawler, loading the font, the HTTP client, and the saved
    /// crawl position
    ///
    /// A missing font file or corrupt progress store fails here, before any
    /// network traffic happens.
    pub fn new(config: Config) -> Result<Self> {
        let fonts = FontAssets::load(Path::new(&config.render.font_path))?;
        std::fs::create_dir_all(&config.render.output_dir)?;

        let client = build_http_client()?;
        let base_url = Url::parse(&config.site.start_url)?;
        let store = ProgressStore::new(&config.state.path, &config.site.start_url);
        let position = store.load_position()?;

        tracing::info!(
            "Resuming at sequence {} ({})",
            position.sequence,
            position.url
        );

        let options = ExtractOptions {
            require_entry: config.site.require_entry,
        };

        Ok(Crawler {
            config: Arc::new(config),
            client,
            store,
            fonts,
            options,
            base_url,
            position,
            finished: false,
        })
    }

    /// Current crawl position (the next page to process)
    pub fn position(&self) -> &CrawlPosition {
        &self.position
    }

    /// Processes the page at the current position
    ///
    /// On success the output PDF exists, the Progress Store records the next
    /// position (when a next link was found), and the report is returned.
    /// Returns `None` once the end of the sequence has been reached. On
    /// error, nothing for the current page has been committed.
    pub async fn step(&mut self) -> Result<Option<PageReport>> {
        if self.finished {
            return Ok(None);
        }

        let position = self.position.clone();
        let page_url = self.resolve_url(&position.url)?;

        let markup = fetch_markup(&self.client, page_url.as_str()).await?;
        let content = extract(&markup, &self.options)?;

        // Human-readable progress trace, deliberately on plain stdout
        println!("[{}] : \"{}\"", position.sequence, content.hover_text);

        let document_path = self.render_page(&position, &content).await?;

        match &content.next_url {
            Some(next_url) => {
                // The record keeps the href exactly as extracted; resolution
                // against the site origin happens at fetch time
                let next = CrawlPosition {
                    sequence: position.sequence + 1,
                    url: next_url.clone(),
                };
                self.store.save_position(&next)?;
                self.position = next;
            }
            None => {
                tracing::info!("No next link at sequence {}, crawl complete", position.sequence);
                self.finished = true;
            }
        }

        Ok(Some(PageReport {
            sequence: position.sequence,
            url: page_url.into(),
            hover_text: content.hover_text,
            image_count: content.images.len(),
            document_path,
        }))
    }

    /// Runs `step()` to the end of the sequence, returning the page count
    pub async fn run(&mut self) -> Result<u64> {
        let mut pages = 0;
        let started = std::time::Instant::now();

        while let Some(report) = self.step().await? {
            pages += 1;
            tracing::info!(
                "Completed page {} ({} images) -> {}",
                report.sequence,
                report.image_count,
                report.document_path.display()
            );
        }

        tracing::info!("Crawl finished: {} pages in {:?}", pages, started.elapsed());
        Ok(pages)
    }

    /// Renders one page's document: every image page, then the text page
    async fn render_page(
        &self,
        position: &CrawlPosition,
        content: &PageContent,
    ) -> Result<PathBuf> {
        let mut document =
            DocumentBuilder::new(position.sequence, &self.config.render, &self.fonts);

        for src in &content.images {
            println!("    {}", src);
            let image_url = self.resolve_url(src)?;
            let raw = fetch_image_bytes(&self.client, image_url.as_str()).await?;
            let normalized = normalize(
                &self.client,
                raw,
                image_url.as_str(),
                &self.config.optimizer,
            )
            .await?;
            document.append_image_page(normalized);
        }

        if !content.hover_text.is_empty() || !content.story_text.is_empty() {
            document.append_text_page(&content.hover_text, &content.story_text);
        }

        document.finalize()
    }

    /// Resolves a possibly-relative URL against the configured site origin
    fn resolve_url(&self, raw: &str) -> Result<Url> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(self.base_url.join(raw)?),
            Err(e) => Err(e.into()),
        }
    }
}

/// Runs a complete crawl from the saved position to the end of the sequence
pub async fn crawl(config: Config) -> Result<u64> {
    let mut crawler = Crawler::new(config)?;
    crawler.run().await
}
