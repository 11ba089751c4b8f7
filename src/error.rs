use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single file's round trip to the processing endpoint.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload failed with status: {status}")]
    TransportFailure { status: u16 },
    #[error("No processed image in response")]
    MissingResult,
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to parse upload response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download failed with status: {status}")]
    Status { status: u16 },
    #[error("Failed to fetch image: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a supported image", .0.display())]
    Unsupported(PathBuf),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("batch width must be at least 1")]
    ZeroBatchWidth,
    #[error("invalid endpoint '{0}': expected an http:// or https:// URL")]
    InvalidEndpoint(String),
}
