#![allow(dead_code)]

use bg_remover::upload::{FileHandle, PipelineEvent, PipelineSink, UploadTask};
use std::sync::Mutex;

pub fn image(name: &str) -> FileHandle {
    FileHandle::new(name, format!("fake image bytes for {name}").into_bytes(), "image/png")
}

#[derive(Default)]
pub struct CollectingSink {
    pub events: Mutex<Vec<PipelineEvent>>,
}

impl PipelineSink for CollectingSink {
    fn on_event(&self, event: PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(event);
    }
}

impl CollectingSink {
    pub fn settled(&self) -> Vec<UploadTask> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::TaskSettled { task, .. } => Some(task.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::BatchStarted { size, .. } => Some(*size),
                _ => None,
            })
            .collect()
    }
}
