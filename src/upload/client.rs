use crate::error::UploadError;
use crate::upload::types::FileHandle;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

pub const UPLOAD_PATH: &str = "/upload/images";
pub const UPLOAD_FIELD: &str = "files";

/// Sends one file to the processing service and yields a locator for the
/// processed image.
#[async_trait]
pub trait RemoteProcessor: Send + Sync {
    async fn process(&self, file: &FileHandle) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    results: Vec<UploadResult>,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    #[serde(default)]
    success: bool,
    processed_image: Option<String>,
}

#[derive(Clone)]
pub struct BackgroundRemovalClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackgroundRemovalClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, UPLOAD_PATH)
    }

    pub fn locator_for(&self, relative: &str) -> String {
        if relative.starts_with('/') {
            format!("{}{}", self.base_url, relative)
        } else {
            format!("{}/{}", self.base_url, relative)
        }
    }

    fn extract_locator(&self, body: UploadResponse) -> Result<String, UploadError> {
        match body.results.into_iter().next() {
            Some(UploadResult {
                success: true,
                processed_image: Some(path),
            }) if !path.is_empty() => Ok(self.locator_for(&path)),
            _ => Err(UploadError::MissingResult),
        }
    }
}

#[async_trait]
impl RemoteProcessor for BackgroundRemovalClient {
    async fn process(&self, file: &FileHandle) -> Result<String, UploadError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(file = file.name(), size = file.size(), "uploading");
        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::TransportFailure {
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| UploadError::Decode(e.to_string()))?;
        self.extract_locator(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BackgroundRemovalClient {
        BackgroundRemovalClient::new("https://bg.example.com/")
    }

    fn body(json: &str) -> UploadResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn upload_url_joins_fixed_path() {
        assert_eq!(client().upload_url(), "https://bg.example.com/upload/images");
    }

    #[test]
    fn locator_prefixes_base_origin() {
        let client = client();
        assert_eq!(
            client.locator_for("/static/processed/cat.png"),
            "https://bg.example.com/static/processed/cat.png"
        );
        assert_eq!(
            client.locator_for("static/processed/cat.png"),
            "https://bg.example.com/static/processed/cat.png"
        );
    }

    #[test]
    fn first_successful_result_wins() {
        let locator = client()
            .extract_locator(body(
                r#"{"results":[{"success":true,"processed_image":"/out/a.png"},{"success":true,"processed_image":"/out/b.png"}]}"#,
            ))
            .unwrap();
        assert_eq!(locator, "https://bg.example.com/out/a.png");
    }

    #[test]
    fn unsuccessful_first_result_is_missing() {
        let err = client()
            .extract_locator(body(r#"{"results":[{"success":false}]}"#))
            .unwrap_err();
        assert!(matches!(err, UploadError::MissingResult));
    }

    #[test]
    fn empty_or_absent_results_are_missing() {
        assert!(matches!(
            client().extract_locator(body(r#"{"results":[]}"#)),
            Err(UploadError::MissingResult)
        ));
        assert!(matches!(
            client().extract_locator(body(r#"{}"#)),
            Err(UploadError::MissingResult)
        ));
        assert!(matches!(
            client().extract_locator(body(r#"{"results":[{"success":true}]}"#)),
            Err(UploadError::MissingResult)
        ));
    }
}
