//! Append-only progress store
//!
//! Every completed page appends one `"<sequence>, <url>"` line to a plain
//! text file. On startup the last line is the resume point; an absent or
//! empty file means the crawl starts from the configured first page. The
//! file is never rewritten or truncated, so it doubles as an audit trail of
//! every page ever completed.

use crate::{PanelboundError, Result};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One resumable unit of crawl progress: the next page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlPosition {
    /// 1-based page sequence number, increasing by exactly 1 per page
    pub sequence: u64,

    /// URL of the page to fetch at this sequence number
    pub url: String,
}

impl fmt::Display for CrawlPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.sequence, self.url)
    }
}

impl FromStr for CrawlPosition {
    type Err = PanelboundError;

    /// Parses a `"<sequence>, <url>"` record.
    ///
    /// A wrong field count or non-numeric sequence means the store has been
    /// corrupted; resuming from corrupt state is unsafe, so this is an error
    /// rather than a silent fallback to the start URL.
    fn from_str(line: &str) -> Result<Self> {
        let (sequence, url) = line.split_once(", ").ok_or_else(|| {
            PanelboundError::StateCorruption {
                line: line.to_string(),
                reason: "expected '<sequence>, <url>'".to_string(),
            }
        })?;

        let sequence: u64 =
            sequence
                .parse()
                .map_err(|_| PanelboundError::StateCorruption {
                    line: line.to_string(),
                    reason: format!("non-numeric sequence {:?}", sequence),
                })?;

        if url.is_empty() {
            return Err(PanelboundError::StateCorruption {
                line: line.to_string(),
                reason: "empty URL".to_string(),
            });
        }

        Ok(CrawlPosition {
            sequence,
            url: url.to_string(),
        })
    }
}

/// Durable store for the crawl position
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    start_url: String,
}

impl ProgressStore {
    /// Creates a store backed by the given file
    ///
    /// # Arguments
    ///
    /// * `path` - Progress file path; created on first save
    /// * `start_url` - Position returned when no record exists yet
    pub fn new(path: impl Into<PathBuf>, start_url: impl Into<String>) -> Self {
        ProgressStore {
            path: path.into(),
            start_url: start_url.into(),
        }
    }

    /// Returns the most recently saved position, or sequence 1 at the
    /// configured start URL when the store is absent or empty
    pub fn load_position(&self) -> Result<CrawlPosition> {
        if !self.path.exists() {
            return Ok(self.initial_position());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match content.lines().rev().find(|line| !line.trim().is_empty()) {
            Some(line) => line.parse(),
            None => Ok(self.initial_position()),
        }
    }

    /// Appends a new record; prior lines are never touched
    pub fn save_position(&self, position: &CrawlPosition) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", position)?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initial_position(&self) -> CrawlPosition {
        CrawlPosition {
            sequence: 1,
            url: self.start_url.clone(),
        }
    }
}
