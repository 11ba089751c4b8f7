mod client;
mod download;
mod pipeline;
mod types;

pub use client::{BackgroundRemovalClient, RemoteProcessor, UPLOAD_FIELD, UPLOAD_PATH};
pub use download::{download_to, fetch_bytes, suggested_file_name};
pub use pipeline::{partition, BatchPipeline, PipelineSink};
pub use types::{FileHandle, PipelineEvent, ProgressState, TaskStatus, UploadTask};
