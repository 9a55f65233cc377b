use crate::{Result, ScrapeError};
use serde::Deserialize;

/// Body of a scrape trigger: `{ "pages": <positive integer> }`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScrapeRequest {
    pub pages: i64,
}

impl ScrapeRequest {
    pub fn new(pages: i64) -> Self {
        Self { pages }
    }

    /// Returns the validated number of listing pages to crawl
    ///
    /// Rejects zero, negative, and out-of-range counts.
    pub fn page_count(&self) -> Result<u32> {
        if self.pages < 1 {
            return Err(ScrapeError::InvalidRequest(format!(
                "pages must be a positive integer, got {}",
                self.pages
            )));
        }

        u32::try_from(self.pages).map_err(|_| {
            ScrapeError::InvalidRequest(format!("pages is too large: {}", self.pages))
        })
    }
}
