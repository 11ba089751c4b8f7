use bg_remover::error::UploadError;
use bg_remover::upload::{BackgroundRemovalClient, RemoteProcessor};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::image;

#[tokio::test]
async fn success_returns_absolute_locator() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/images"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"files\""))
        .and(body_string_contains("filename=\"cat.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "success": true, "processed_image": "/static/processed/cat.png" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackgroundRemovalClient::new(&server.uri());
    let locator = client.process(&image("cat.png")).await.unwrap();

    assert_eq!(locator, format!("{}/static/processed/cat.png", server.uri()));
}

#[tokio::test]
async fn error_status_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/images"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = BackgroundRemovalClient::new(&server.uri());
    let err = client.process(&image("a.png")).await.unwrap_err();

    assert!(matches!(err, UploadError::TransportFailure { status: 500 }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn unsuccessful_result_is_reported_as_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "success": false }]
        })))
        .mount(&server)
        .await;

    let client = BackgroundRemovalClient::new(&server.uri());
    let err = client.process(&image("b.png")).await.unwrap_err();

    assert!(matches!(err, UploadError::MissingResult));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/images"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = BackgroundRemovalClient::new(&server.uri());
    let err = client.process(&image("c.png")).await.unwrap_err();

    assert!(matches!(err, UploadError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let client = BackgroundRemovalClient::new("http://127.0.0.1:9");
    let err = client.process(&image("d.png")).await.unwrap_err();

    assert!(matches!(err, UploadError::Request(_)));
}
