use tracing::warn;
use url::Url;

use crate::{BOOK_PATH_MARKER, CANONICAL_HOST};

/// Whether `raw` points at a book page on the catalogue site.
/// Malformed URLs are simply not acceptable.
pub fn is_acceptable(raw: &str) -> bool {
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };
    parsed.host_str() == Some(CANONICAL_HOST) && parsed.path().contains(BOOK_PATH_MARKER)
}

/// Keeps the acceptable URLs in their original order and warns about the rest.
pub fn admit(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .filter(|url| {
            let ok = is_acceptable(url);
            if !ok {
                warn!(url = %url, "Invalid Goodreads URL, skipping");
            }
            ok
        })
        .collect()
}
