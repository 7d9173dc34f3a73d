use clap::Parser;
use reviewscrape::config::Config;
use reviewscrape::process::{process_books, Summary};
use reviewscrape::Error;
use tokio_util::sync::CancellationToken;

fn config(args: &[&str]) -> Config {
    Config::try_parse_from(std::iter::once("reviewscrape").chain(args.iter().copied())).unwrap()
}

#[tokio::test]
async fn missing_credential_fails_before_any_work() {
    let mut cfg = config(&["https://www.goodreads.com/book/show/1"]);
    cfg.api_key = None;
    let err = process_books(&cfg, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::MissingApiKey));
}

#[tokio::test]
async fn missing_url_file_is_fatal() {
    let cfg = config(&["--api", "key", "-f", "definitely/not/here.txt"]);
    let err = process_books(&cfg, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::UrlFile { .. }));
}

#[tokio::test]
async fn no_input_is_fatal() {
    let cfg = config(&["--api", "key"]);
    let err = process_books(&cfg, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::NoInput));
}

#[tokio::test]
async fn nothing_admitted_is_an_empty_run() {
    let tmp = tempfile::TempDir::new().unwrap();
    let urls = tmp.path().join("urls.txt");
    std::fs::write(
        &urls,
        "# authors are not books\nhttps://www.goodreads.com/author/show/1\n\nnot a url\n",
    )
    .unwrap();

    let output = tmp.path().join("out.csv");
    let cfg = config(&[
        "--api",
        "key",
        "-f",
        urls.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    let summary = process_books(&cfg, CancellationToken::new()).await.unwrap();
    assert_eq!(summary, Summary::default());
    assert!(!output.exists());
}
