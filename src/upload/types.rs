use crate::error::UploadError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(1);

/// One user-selected file held in memory.
#[derive(Debug, Clone)]
pub struct FileHandle {
    id: u64,
    name: String,
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            id: NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Unique for the lifetime of the process, even across identical names.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Succeeded { locator: String },
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct UploadTask {
    handle: FileHandle,
    status: TaskStatus,
}

impl UploadTask {
    pub fn new(handle: FileHandle) -> Self {
        Self {
            handle,
            status: TaskStatus::Pending,
        }
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, TaskStatus::Pending)
    }

    pub fn locator(&self) -> Option<&str> {
        match &self.status {
            TaskStatus::Succeeded { locator } => Some(locator),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            TaskStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Moves a pending task into its terminal state. Returns `false` and
    /// leaves the task untouched if it already settled.
    pub fn settle(&mut self, outcome: Result<String, UploadError>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = match outcome {
            Ok(locator) => TaskStatus::Succeeded { locator },
            Err(e) => TaskStatus::Failed {
                error: e.to_string(),
            },
        };
        true
    }
}

/// Counters for one pipeline invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub processed: usize,
    pub total: usize,
}

impl ProgressState {
    pub fn start(total: usize) -> Self {
        Self {
            processed: 0,
            total,
        }
    }

    pub fn record(&mut self) {
        if self.processed < self.total {
            self.processed += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f32 / self.total as f32
        }
    }

    pub fn percentage(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Started { total: usize },
    BatchStarted { index: usize, size: usize },
    TaskSettled { task: UploadTask, progress: ProgressState },
    Finished { progress: ProgressState },
}
