//! Everything one job does: resolve the book, then page through its reviews.

use reqwest::Client;
use tracing::{debug, warn};

use crate::models::{BookMetadata, BookResult};
use crate::paginate::Paginator;
use crate::parse::parse_book_page;
use crate::request::fetch_book_page;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    paginator: Paginator,
}

impl Scraper {
    pub fn new(client: Client, paginator: Paginator) -> Self {
        Self { client, paginator }
    }

    /// Fetches the book page and extracts its metadata.
    pub async fn resolve(&self, book_url: &str) -> Result<BookMetadata> {
        let (metadata, _) = self.load_book(book_url).await?;
        Ok(metadata)
    }

    /// One GET serves both the metadata and the work ID.
    async fn load_book(&self, book_url: &str) -> Result<(BookMetadata, Option<String>)> {
        let html = fetch_book_page(&self.client, book_url).await?;
        parse_book_page(html, book_url.to_string()).await
    }

    /// Errors only when the book itself can't be resolved. A pagination failure
    /// keeps whatever reviews arrived before it.
    pub async fn scrape_book(
        &self,
        book_url: &str,
        max_reviews: usize,
        language: Option<&str>,
    ) -> Result<BookResult> {
        let (metadata, work_id) = self.load_book(book_url).await?;
        let work_id = work_id.ok_or_else(|| Error::WorkIdNotFound(book_url.to_string()))?;
        debug!(url = book_url, work_id = %work_id, "Found work ID");

        let harvest = self
            .paginator
            .fetch_reviews(&work_id, max_reviews, language, &metadata)
            .await;
        if let Some(e) = harvest.stopped_by {
            warn!(
                url = book_url,
                kept = harvest.reviews.len(),
                error = %e,
                "Review fetch stopped early, keeping partial results"
            );
        }

        Ok(BookResult {
            metadata,
            reviews: harvest.reviews,
        })
    }
}
