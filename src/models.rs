//! Records that flow through the harvesting pipeline.

/// One admitted book URL waiting for a worker.
pub type Job = String;

/// Book-level fields resolved once per job.
#[derive(Debug, Clone, PartialEq)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub average_rating: f64,
    pub url: String,
}

/// A single normalized review, one CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Review {
    pub book_url: String,
    pub book_title: String,
    pub review_id: String,
    pub reviewer_name: String,
    /// Empty when the reviewer left no star rating.
    pub rating: String,
    pub review_text: String,
    /// `YYYY-MM-DD` in UTC, empty when unknown.
    pub review_date: String,
    pub language: String,
}

impl Review {
    /// Column values in CSV header order.
    pub fn as_record(&self) -> [&str; 8] {
        [
            self.book_url.as_str(),
            self.book_title.as_str(),
            self.review_id.as_str(),
            self.reviewer_name.as_str(),
            self.rating.as_str(),
            self.review_text.as_str(),
            self.review_date.as_str(),
            self.language.as_str(),
        ]
    }
}

/// What a worker hands back to the result consumer.
#[derive(Debug, Clone)]
pub struct BookResult {
    pub metadata: BookMetadata,
    /// In the order the remote endpoint returned them.
    pub reviews: Vec<Review>,
}
