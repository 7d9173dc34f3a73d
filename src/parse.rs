use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::models::BookMetadata;
use crate::{Error, Result, UNKNOWN_AUTHOR, UNKNOWN_TITLE};

const TITLE_SELECTOR: &str = r#"a[data-testid="title"]"#;
const AUTHOR_SELECTOR: &str = r#"span.ContributorLink__name[data-testid="name"]"#;
const RATING_SELECTOR: &str = "div.RatingStatistics__column";

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("valid decimal regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WORK_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""work":\s*\{\s*"__ref":\s*"Work:(kca://work/[^"]+)""#).expect("valid work id regex")
});

/// Parses a book's review page off the async runtime.
/// Returns the metadata and the work ID embedded in the page scripts, if any.
pub(crate) async fn parse_book_page(
    html: String,
    book_url: String,
) -> Result<(BookMetadata, Option<String>)> {
    spawn_blocking(move || -> Result<(BookMetadata, Option<String>)> {
        let metadata = parse_metadata(&html, &book_url)?;
        let work_id = extract_work_id(&html);
        Ok((metadata, work_id))
    })
    .await?
}

/// Extracts title, author and average rating.
/// Missing display fields fall back to sentinels (rating to `0.0`) instead of failing.
pub fn parse_metadata(html: &str, book_url: &str) -> Result<BookMetadata> {
    let doc = Html::parse_document(html);

    let title_selector = create_selector(TITLE_SELECTOR)?;
    let author_selector = create_selector(AUTHOR_SELECTOR)?;
    let rating_selector = create_selector(RATING_SELECTOR)?;

    let title = doc
        .select(&title_selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let author = doc
        .select(&author_selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let average_rating = doc
        .select(&rating_selector)
        .next()
        .map(rating_of)
        .unwrap_or(0.0);

    Ok(BookMetadata {
        title,
        author,
        average_rating,
        url: book_url.to_string(),
    })
}

/// The accessible label is authoritative; the visible text is the fallback
/// whenever the label is absent or yields zero.
fn rating_of(element: ElementRef<'_>) -> f64 {
    let from_label = element
        .value()
        .attr("aria-label")
        .and_then(extract_decimal)
        .unwrap_or(0.0);
    if from_label != 0.0 {
        return from_label;
    }
    extract_decimal(&element_text(element)).unwrap_or(0.0)
}

#[inline]
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First decimal number in `text`.
pub fn extract_decimal(text: &str) -> Option<f64> {
    DECIMAL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Removes every `<...>` span in one pass. Entities are left as they are.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

pub fn extract_work_id(html: &str) -> Option<String> {
    WORK_ID_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
