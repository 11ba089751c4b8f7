use crate::upload::client::RemoteProcessor;
use crate::upload::types::{FileHandle, PipelineEvent, ProgressState, UploadTask};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Receives pipeline events as they happen. Called from runtime worker
/// threads, so implementations must be thread-safe.
pub trait PipelineSink: Send + Sync {
    fn on_event(&self, event: PipelineEvent);
}

/// Splits `items` into contiguous groups of at most `width` elements.
pub fn partition<T>(items: &[T], width: usize) -> Vec<&[T]> {
    items.chunks(width.max(1)).collect()
}

pub struct BatchPipeline<P> {
    processor: P,
    batch_width: usize,
    progress: Arc<Mutex<ProgressState>>,
}

impl<P: RemoteProcessor> BatchPipeline<P> {
    pub fn new(processor: P, batch_width: usize) -> Self {
        Self {
            processor,
            batch_width: batch_width.max(1),
            progress: Arc::new(Mutex::new(ProgressState::default())),
        }
    }

    pub fn progress(&self) -> ProgressState {
        *self.lock_progress()
    }

    /// Uploads every file, `batch_width` at a time. A group must fully
    /// settle before the next one starts. Returns the settled tasks in input
    /// order; events are emitted in completion order.
    pub async fn run(&self, files: Vec<FileHandle>, sink: &dyn PipelineSink) -> Vec<UploadTask> {
        let total = files.len();
        *self.lock_progress() = ProgressState::start(total);
        sink.on_event(PipelineEvent::Started { total });

        let groups = partition(&files, self.batch_width);
        info!(
            total,
            batches = groups.len(),
            batch_width = self.batch_width,
            "starting upload pipeline"
        );

        let mut settled = Vec::with_capacity(total);
        for (index, group) in groups.into_iter().enumerate() {
            debug!(batch = index, size = group.len(), "starting batch");
            sink.on_event(PipelineEvent::BatchStarted {
                index,
                size: group.len(),
            });

            let calls = group
                .iter()
                .cloned()
                .map(|handle| self.settle_one(handle, sink));
            settled.extend(join_all(calls).await);
        }

        let progress = self.progress();
        let failed = settled.iter().filter(|t| t.error_message().is_some()).count();
        info!(
            processed = progress.processed,
            total = progress.total,
            failed,
            "upload pipeline finished"
        );
        sink.on_event(PipelineEvent::Finished { progress });
        settled
    }

    async fn settle_one(&self, handle: FileHandle, sink: &dyn PipelineSink) -> UploadTask {
        let mut task = UploadTask::new(handle);
        let outcome = self.processor.process(task.handle()).await;
        if let Err(e) = &outcome {
            warn!(file = task.handle().name(), error = %e, "upload failed");
        }
        task.settle(outcome);

        let progress = {
            let mut progress = self.lock_progress();
            progress.record();
            *progress
        };
        sink.on_event(PipelineEvent::TaskSettled {
            task: task.clone(),
            progress,
        });
        task
    }

    fn lock_progress(&self) -> MutexGuard<'_, ProgressState> {
        self.progress
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
