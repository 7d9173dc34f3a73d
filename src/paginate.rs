//! Cursor driven review pagination.

use std::time::Duration;

use chrono::DateTime;
use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{debug, error, info, trace, warn};

use crate::graphql::{ReviewNode, ReviewsRequest, ReviewsResponse};
use crate::models::{BookMetadata, Review};
use crate::parse::strip_tags;
use crate::{Error, Result, DEFAULT_PAGE_DELAY_MS, SERVER_PAGE_LIMIT};

/// Reviews collected for one work, plus the reason pagination stopped early, if it did.
///
/// A `stopped_by` error is not a failure of the job: `reviews` still holds
/// everything that arrived before it.
#[derive(Debug, Default)]
pub struct Harvest {
    pub reviews: Vec<Review>,
    pub stopped_by: Option<Error>,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    client: Client,
    api_key: String,
    endpoint: String,
    page_limit: usize,
    page_delay: Duration,
}

impl Paginator {
    pub fn new(client: Client, api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            page_limit: SERVER_PAGE_LIMIT,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
        }
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Largest page ever requested. Never below one.
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// Pages through the reviews of `work_id` until `max_count` reviews are collected,
    /// the endpoint runs out of pages, or a page fails.
    pub async fn fetch_reviews(
        &self,
        work_id: &str,
        max_count: usize,
        language: Option<&str>,
        metadata: &BookMetadata,
    ) -> Harvest {
        debug!(work_id, max_count, ?language, "Starting review fetch");

        let mut reviews: Vec<Review> = Vec::with_capacity(max_count.min(self.page_limit));
        let mut cursor: Option<String> = None;
        let mut stopped_by = None;
        let mut first_page = true;

        while reviews.len() < max_count {
            if !first_page {
                sleep(self.page_delay).await;
            }
            first_page = false;

            let limit = self.page_limit.min(max_count - reviews.len());
            let page = match self
                .request_page(work_id, limit, language, cursor.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(work_id, fetched = reviews.len(), error = %e, "Review page failed");
                    stopped_by = Some(e);
                    break;
                }
            };

            let critical: Vec<String> = page.critical_errors().map(ToString::to_string).collect();
            if !critical.is_empty() {
                error!(work_id, fetched = reviews.len(), errors = ?critical, "Critical remote errors");
                stopped_by = Some(Error::Remote(critical.join("; ")));
                break;
            }
            if !page.errors().is_empty() {
                debug!(
                    count = page.errors().len(),
                    "Non-critical authorization errors (expected for public access)"
                );
            }

            let edges = page.edges();
            if edges.is_empty() {
                info!(
                    work_id,
                    total_available = page.total_count(),
                    fetched = reviews.len(),
                    "No more reviews found"
                );
                break;
            }

            let mut processed = 0;
            for edge in edges {
                if reviews.len() >= max_count {
                    break;
                }
                let Some(node) = edge.node.as_ref() else {
                    warn!(work_id, "Skipped empty review edge");
                    continue;
                };
                match normalize_review(node, metadata, language) {
                    Some(review) => {
                        reviews.push(review);
                        processed += 1;
                    }
                    None => warn!(work_id, "Skipped review due to missing ID"),
                }
            }
            debug!(
                batch = edges.len(),
                processed,
                progress = %format!("{}/{max_count}", reviews.len()),
                percent = %format!("{:.1}", progress_percent(reviews.len(), max_count)),
                "Processed review page"
            );

            match page.next_page_token() {
                Some(token) => cursor = Some(token.to_string()),
                None => break,
            }
        }

        reviews.truncate(max_count);
        debug!(work_id, fetched = reviews.len(), "Review fetch completed");
        Harvest {
            reviews,
            stopped_by,
        }
    }

    async fn request_page(
        &self,
        work_id: &str,
        limit: usize,
        language: Option<&str>,
        after: Option<&str>,
    ) -> Result<ReviewsResponse> {
        let body = ReviewsRequest::new(work_id, limit, language, after);
        let res = self
            .client
            .post(&self.endpoint)
            .header("accept", "*/*")
            .header("accept-language", "en-US,en;q=0.9")
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if res.status() != StatusCode::OK {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            debug!(%status, body = %text, "Review endpoint refused page");
            return Err(Error::HttpStatus {
                status,
                url: self.endpoint.clone(),
            });
        }

        let bytes = res.bytes().await?;
        trace!(body = %String::from_utf8_lossy(&bytes), "Review page response");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Share of the cap collected so far. A zero cap counts as done.
fn progress_percent(fetched: usize, max_count: usize) -> f64 {
    if max_count == 0 {
        return 100.0;
    }
    fetched as f64 / max_count as f64 * 100.0
}

/// Turns one remote record into a `Review`. Records without an ID yield `None`.
pub fn normalize_review(
    node: &ReviewNode,
    metadata: &BookMetadata,
    language: Option<&str>,
) -> Option<Review> {
    let review_id = node.id.as_deref().filter(|id| !id.is_empty())?;

    let rating = node
        .rating
        .filter(|rating| *rating > 0)
        .map(|rating| rating.to_string())
        .unwrap_or_default();

    let review_date = node
        .created_at
        .filter(|ms| *ms > 0.0)
        .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
        .map(|created| created.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let reviewer_name = node
        .creator
        .as_ref()
        .and_then(|creator| creator.name.clone())
        .unwrap_or_default();

    Some(Review {
        book_url: metadata.url.clone(),
        book_title: metadata.title.clone(),
        review_id: review_id.to_string(),
        reviewer_name,
        rating,
        review_text: node.text.as_deref().map(strip_tags).unwrap_or_default(),
        review_date,
        language: language.unwrap_or_default().to_string(),
    })
}
