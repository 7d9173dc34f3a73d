use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{Error, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// One client per run. `Client` uses an `Arc` internally so workers clone it cheaply.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Requests the review listing of a book and returns its HTML.
/// Anything but `200 OK` is an error.
pub async fn fetch_book_page(client: &Client, book_url: &str) -> Result<String> {
    let reviews_url = format!("{}/reviews", book_url.trim_end_matches('/'));
    debug!(url = %reviews_url, "Requesting book page");

    let res = client.get(&reviews_url).send().await?;
    if res.status() != StatusCode::OK {
        return Err(Error::HttpStatus {
            status: res.status(),
            url: reviews_url,
        });
    }
    let html = res.text().await?;
    Ok(html)
}
