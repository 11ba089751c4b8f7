use crate::error::DownloadError;
use std::path::Path;
use tracing::info;

pub fn suggested_file_name(original: &str) -> String {
    format!("processed_{}", original)
}

pub async fn fetch_bytes(client: &reqwest::Client, locator: &str) -> Result<Vec<u8>, DownloadError> {
    let response = client.get(locator).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

/// Fetches `locator` and writes it to `dest`. Nothing is written unless the
/// whole body arrived.
pub async fn download_to(
    client: &reqwest::Client,
    locator: &str,
    dest: &Path,
) -> Result<u64, DownloadError> {
    let bytes = fetch_bytes(client, locator).await?;
    tokio::fs::write(dest, &bytes)
        .await
        .map_err(|source| DownloadError::Write {
            path: dest.to_path_buf(),
            source,
        })?;
    info!(locator, dest = %dest.display(), size = bytes.len(), "saved processed image");
    Ok(bytes.len() as u64)
}
