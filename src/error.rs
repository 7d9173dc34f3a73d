use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // -- Configuration
    #[error("API key is required. Pass --api or set GOODREADS_API_KEY.")]
    MissingApiKey,
    #[error("Provide either a single URL or an input file with -f.")]
    NoInput,
    #[error("Concurrency must be at least 1.")]
    ZeroConcurrency,
    #[error("URL file '{path}' could not be read: {source}")]
    UrlFile {
        path: PathBuf,
        source: std::io::Error,
    },

    // -- Scraping
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Work ID not found in page content of {0}")]
    WorkIdNotFound(String),
    #[error("HTTP error: {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("Critical remote errors: {0}")]
    Remote(String),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    // -- Persistence
    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    // -- Runtime
    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
}
