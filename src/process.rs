//! The worker pool.
//!
//! A feeder task offers admitted URLs on a bounded job channel, a fixed number of
//! workers compete for them, and the caller's task persists every `BookResult`
//! the moment it arrives. The result channel closes once the last worker returns
//! and drops its sender.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::models::{BookResult, Job};
use crate::paginate::Paginator;
use crate::request::build_client;
use crate::scrape::Scraper;
use crate::sink::CsvSink;
use crate::validate::admit;
use crate::{info_time, Result};

type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

/// Per-run knobs every worker shares.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub max_reviews: usize,
    pub language: Option<String>,
    pub output: PathBuf,
}

/// End of run counters. A book whose scrape succeeded but matched no reviews
/// still counts as succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub total: usize,
}

pub struct Dispatcher {
    scraper: Arc<Scraper>,
    sink: Arc<CsvSink>,
    settings: Arc<HarvestSettings>,
}

impl Dispatcher {
    pub fn new(scraper: Scraper, sink: CsvSink, settings: HarvestSettings) -> Self {
        Self {
            scraper: Arc::new(scraper),
            sink: Arc::new(sink),
            settings: Arc::new(settings),
        }
    }

    /// Processes every job exactly once with `concurrency` workers.
    /// After `cancel` fires no new job is offered or claimed; jobs already in flight finish.
    pub async fn run(&self, urls: Vec<Job>, concurrency: usize, cancel: CancellationToken) -> Summary {
        let total = urls.len();
        if total == 0 {
            return Summary::default();
        }

        let (job_tx, job_rx) = mpsc::channel::<Job>(total);
        let job_rx: JobQueue = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<BookResult>(total);

        let feeder = tokio::spawn(feed_jobs(urls, job_tx, cancel.clone()));

        let mut pool = JoinSet::new();
        for id in 1..=concurrency.max(1) {
            pool.spawn(worker(
                id,
                job_rx.clone(),
                result_tx.clone(),
                self.scraper.clone(),
                self.settings.clone(),
                cancel.clone(),
            ));
        }
        // Only the workers hold senders now.
        drop(result_tx);

        let supervisor = tokio::spawn(async move {
            while let Some(res) = pool.join_next().await {
                if let Err(e) = res {
                    error!(error = %e, "Worker task failed");
                }
            }
        });

        let mut summary = Summary {
            succeeded: 0,
            total,
        };
        let mut processed = 0;
        while let Some(book) = result_rx.recv().await {
            processed += 1;
            let title = &book.metadata.title;

            if book.reviews.is_empty() {
                warn!("[{processed}/{total}] No reviews found for '{title}'");
                summary.succeeded += 1;
                continue;
            }

            match self.sink.append(&book.reviews, &self.settings.output).await {
                Ok(()) => {
                    info!(
                        "[{processed}/{total}] Saved {} reviews for '{title}'",
                        book.reviews.len()
                    );
                    summary.succeeded += 1;
                }
                Err(e) => {
                    error!(url = %book.metadata.url, error = %e, "[{processed}/{total}] Failed to save reviews for '{title}'");
                }
            }
        }

        for (name, handle) in [("feeder", feeder), ("supervisor", supervisor)] {
            if let Err(e) = handle.await {
                error!(task = name, error = %e, "Pipeline task failed");
            }
        }
        summary
    }
}

/// Offers every URL once; stops offering as soon as `cancel` fires.
/// Dropping `job_tx` on return closes the queue.
async fn feed_jobs(urls: Vec<Job>, job_tx: mpsc::Sender<Job>, cancel: CancellationToken) {
    for url in urls {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Signal received. Stopping new job dispatch...");
                return;
            }
            sent = job_tx.send(url) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
}

async fn worker(
    id: usize,
    jobs: JobQueue,
    results: mpsc::Sender<BookResult>,
    scraper: Arc<Scraper>,
    settings: Arc<HarvestSettings>,
    cancel: CancellationToken,
) {
    loop {
        let job = {
            let mut jobs = jobs.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                job = jobs.recv() => job,
            }
        };
        let Some(url) = job else {
            break;
        };

        debug!(worker = id, url = %url, "Starting scraping");
        match scraper
            .scrape_book(&url, settings.max_reviews, settings.language.as_deref())
            .await
        {
            Ok(book) => {
                debug!(worker = id, url = %url, reviews = book.reviews.len(), "Finished scraping");
                if results.send(book).await.is_err() {
                    break;
                }
            }
            Err(e) => error!(worker = id, url = %url, error = %e, "Failed to scrape"),
        }
    }
    debug!(worker = id, "Worker exiting");
}

/// Runs the whole harvest described by `config`.
/// Configuration problems surface here before any request is made.
pub async fn process_books(config: &Config, cancel: CancellationToken) -> Result<Summary> {
    let start_time = Local::now();
    config.validate()?;
    let api_key = config.api_key()?;

    let urls = config.load_input().await?;
    match (&config.input_url, &config.input_file) {
        (Some(url), _) => info!(url = %url, "Processing single URL"),
        (None, Some(path)) => info!("Loaded {} URLs from {}", urls.len(), path.display()),
        (None, None) => {}
    }

    let urls = admit(urls);
    if urls.is_empty() {
        info!("No valid URLs to process.");
        return Ok(Summary::default());
    }

    let output = config.output_path();
    let client = build_client(config.timeout())?;
    let paginator = Paginator::new(client.clone(), api_key, config.endpoint.clone())
        .with_page_delay(config.page_delay());
    let dispatcher = Dispatcher::new(
        Scraper::new(client, paginator),
        CsvSink::new(),
        HarvestSettings {
            max_reviews: config.max_reviews,
            language: config.language_filter().map(String::from),
            output: output.clone(),
        },
    );

    info_time!(
        "Processing {} valid URLs with {} workers...",
        urls.len(),
        config.concurrency
    );
    let summary = dispatcher.run(urls, config.concurrency, cancel).await;

    info_time!(
        start_time,
        "Scraping completed! Successfully processed {}/{} URLs.",
        summary.succeeded,
        summary.total
    );
    info!("Results saved to: {}", output.display());
    Ok(summary)
}
