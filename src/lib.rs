//! Concurrent review harvester.
//!
//! Resolves book metadata from a catalogue page, pages through the review query
//! endpoint for each book, and appends the normalized reviews to a CSV file.

mod macros;

pub mod config;
mod error;
pub mod graphql;
pub mod models;
pub mod paginate;
mod parse;
pub mod process;
mod request;
pub mod scrape;
pub mod sink;
pub mod validate;

pub use error::{Error, Result};
pub use parse::{extract_decimal, extract_work_id, parse_metadata, strip_tags};
pub use request::{build_client, fetch_book_page};

/// Host every admitted book URL must have.
pub const CANONICAL_HOST: &str = "www.goodreads.com";
/// Path segment that marks a book detail page.
pub const BOOK_PATH_MARKER: &str = "/book/show/";
/// Review query endpoint.
pub const GRAPHQL_ENDPOINT: &str =
    "https://kxbwmqov6jgg3daaamb744ycu4.appsync-api.us-east-1.amazonaws.com/graphql";
/// The endpoint refuses pages larger than this.
pub const SERVER_PAGE_LIMIT: usize = 100;
/// Pause between two consecutive page requests of one book.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1000;
/// Every outbound request is bounded by this.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

pub const CSV_HEADER: [&str; 8] = [
    "BookURL",
    "BookTitle",
    "ReviewID",
    "ReviewerName",
    "Rating",
    "ReviewText",
    "ReviewDate",
    "Language",
];
