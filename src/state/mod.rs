//! Crawl progress persistence

mod progress;

pub use progress::{CrawlPosition, ProgressStore};
