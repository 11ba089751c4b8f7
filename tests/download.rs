use bg_remover::error::DownloadError;
use bg_remover::upload::download_to;
use std::fs;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn saves_fetched_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/static/processed/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"processed png".to_vec()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("processed_cat.png");
    let locator = format!("{}/static/processed/cat.png", server.uri());

    let written = download_to(&reqwest::Client::new(), &locator, &dest)
        .await
        .unwrap();

    assert_eq!(written, 13);
    assert_eq!(fs::read(&dest).unwrap(), b"processed png");
}

#[tokio::test]
async fn missing_image_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("processed_gone.png");
    let locator = format!("{}/static/processed/gone.png", server.uri());

    let err = download_to(&reqwest::Client::new(), &locator, &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Status { status: 404 }));
    assert!(!dest.exists());
}

#[tokio::test]
async fn unreachable_locator_is_an_error_not_a_panic() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("processed_x.png");

    let err = download_to(&reqwest::Client::new(), "http://127.0.0.1:9/x.png", &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Request(_)));
    assert!(!dest.exists());
}

#[tokio::test]
async fn unwritable_destination_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dest = dir.path().join("no-such-dir").join("out.png");
    let locator = format!("{}/x.png", server.uri());

    let err = download_to(&reqwest::Client::new(), &locator, &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Write { .. }));
}
