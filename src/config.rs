//! Command line surface and input loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use clap::Parser;

use crate::{Error, Result, DEFAULT_PAGE_DELAY_MS, DEFAULT_TIMEOUT_SECS, GRAPHQL_ENDPOINT};

/// Placeholder credential shipped in sample configs; never valid.
const PLACEHOLDER_API_KEY: &str = "xxxxxx";

#[derive(Debug, Clone, Parser)]
#[command(name = "reviewscrape")]
#[command(about = "Harvest Goodreads reviews for a list of books into a CSV file")]
#[command(version)]
pub struct Config {
    /// API key for the review query endpoint
    #[arg(long = "api", env = "GOODREADS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 5)]
    pub concurrency: usize,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Text file containing Goodreads URLs (one per line)
    #[arg(short = 'f', long = "file")]
    pub input_file: Option<PathBuf>,

    /// A single Goodreads book URL
    #[arg(value_name = "URL")]
    pub input_url: Option<String>,

    /// Maximum number of reviews to scrape per book
    #[arg(short, long, default_value_t = 100)]
    pub max_reviews: usize,

    /// Output CSV file (default: timestamped file under results/)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Language code for reviews, empty for no filter
    #[arg(short, long, default_value = "id")]
    pub language: String,

    /// Pause between two page requests of the same book, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PAGE_DELAY_MS)]
    pub page_delay_ms: u64,

    /// Timeout of every outbound request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Review query endpoint
    #[arg(long, default_value = GRAPHQL_ENDPOINT, hide = true)]
    pub endpoint: String,
}

impl Config {
    /// Rejects configurations that must not reach the network.
    pub fn validate(&self) -> Result<()> {
        self.api_key()?;
        if self.concurrency == 0 {
            return Err(Error::ZeroConcurrency);
        }
        if self.input_url.is_none() && self.input_file.is_none() {
            return Err(Error::NoInput);
        }
        Ok(())
    }

    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(Error::MissingApiKey),
        }
    }

    pub fn language_filter(&self) -> Option<&str> {
        let lang = self.language.trim();
        (!lang.is_empty()).then_some(lang)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured output file, or a fresh timestamped one.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stamp = Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(format!("results/goodreads_reviews_{stamp}.csv"))
        })
    }

    /// A positional URL wins over the URL file.
    pub async fn load_input(&self) -> Result<Vec<String>> {
        if let Some(url) = &self.input_url {
            return Ok(vec![url.clone()]);
        }
        match &self.input_file {
            Some(path) => load_urls(path).await,
            None => Err(Error::NoInput),
        }
    }
}

/// Reads one URL per line, skipping blank lines and `#` comments.
pub async fn load_urls(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::UrlFile {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
