#![allow(dead_code)]

use std::collections::HashMap;
use std::ops::Range;
use std::time::Duration;

use reviewscrape::models::BookMetadata;
use reviewscrape::paginate::Paginator;
use reviewscrape::{build_client, scrape::Scraper};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const GRAPHQL_PATH: &str = "/graphql";

/// Serves review pages per work ID. Page `n` is reached with cursor `p{n}`.
#[derive(Default)]
pub struct PagedReviews {
    pages: HashMap<String, Vec<ResponseTemplate>>,
}

impl PagedReviews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn work(mut self, work_id: &str, pages: Vec<ResponseTemplate>) -> Self {
        self.pages.insert(work_id.to_string(), pages);
        self
    }
}

impl Respond for PagedReviews {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).expect("json request body");
        let work_id = body["variables"]["filters"]["resourceId"]
            .as_str()
            .unwrap_or_default();
        let page = body["variables"]["pagination"]["after"]
            .as_str()
            .and_then(|cursor| cursor.strip_prefix('p'))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);

        self.pages
            .get(work_id)
            .and_then(|pages| pages.get(page))
            .cloned()
            .unwrap_or_else(|| ResponseTemplate::new(404))
    }
}

pub fn review_node(id: &str) -> Value {
    json!({
        "__typename": "Review",
        "id": id,
        "creator": {"id": 1, "name": format!("reader of {id}"), "contributor": null},
        "createdAt": 1390843144000u64,
        "text": format!("<p>Review <b>{id}</b></p>"),
        "rating": 4,
        "viewerHasLiked": null
    })
}

/// A page with reviews `{work_id}-r{i}` for every `i` in `ids`.
pub fn page_json(work_id: &str, ids: Range<usize>, next: Option<usize>) -> Value {
    let edges: Vec<Value> = ids
        .map(|i| json!({"node": review_node(&format!("{work_id}-r{i}"))}))
        .collect();
    json!({
        "data": {"getReviews": {
            "totalCount": 1000,
            "edges": edges,
            "pageInfo": {
                "prevPageToken": null,
                "nextPageToken": next.map(|n| format!("p{n}")).unwrap_or_default()
            }
        }}
    })
}

pub fn page(work_id: &str, ids: Range<usize>, next: Option<usize>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(page_json(work_id, ids, next))
}

pub fn with_errors(mut page: Value, kinds: &[&str]) -> ResponseTemplate {
    let errors: Vec<Value> = kinds
        .iter()
        .map(|kind| json!({"errorType": kind, "message": format!("{kind} error"), "path": ["getReviews"]}))
        .collect();
    page["errors"] = Value::from(errors);
    ResponseTemplate::new(200).set_body_json(page)
}

pub async fn mount_reviews(server: &MockServer, reviews: PagedReviews) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(reviews)
        .mount(server)
        .await;
}

pub fn work_id(n: usize) -> String {
    format!("kca://work/{n}")
}

pub fn book_html(n: usize) -> String {
    format!(
        r#"<html><body>
        <a data-testid="title" href="/book/show/{n}">Book {n}</a>
        <span class="ContributorLink__name" data-testid="name">Author {n}</span>
        <div class="RatingStatistics__column" aria-label="Average rating of 4.2 out of 5 stars">4.2</div>
        <script>{{"props":{{"work": {{"__ref": "Work:{work}"}}}}}}</script>
        </body></html>"#,
        work = work_id(n)
    )
}

pub fn book_url(server: &MockServer, n: usize) -> String {
    format!("{}/book/show/{n}", server.uri())
}

/// Serves the review page of book `n`, expecting exactly one request for it.
pub async fn mount_book(server: &MockServer, n: usize) {
    Mock::given(method("GET"))
        .and(path(format!("/book/show/{n}/reviews")))
        .respond_with(ResponseTemplate::new(200).set_body_string(book_html(n)))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_failing_book(server: &MockServer, n: usize, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/book/show/{n}/reviews")))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

pub fn paginator(server: &MockServer) -> Paginator {
    let client = build_client(Duration::from_secs(5)).expect("client");
    Paginator::new(client, "secret", format!("{}{GRAPHQL_PATH}", server.uri()))
        .with_page_delay(Duration::ZERO)
}

pub fn scraper(server: &MockServer) -> Scraper {
    let client = build_client(Duration::from_secs(5)).expect("client");
    Scraper::new(client, paginator(server))
}

pub fn metadata() -> BookMetadata {
    BookMetadata {
        title: "Book 1".into(),
        author: "Author 1".into(),
        average_rating: 4.2,
        url: "https://www.goodreads.com/book/show/1".into(),
    }
}

/// Bodies of every review query the server saw, in arrival order.
pub async fn query_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|req| req.url.path() == GRAPHQL_PATH)
        .map(|req| serde_json::from_slice(&req.body).expect("json request body"))
        .collect()
}
