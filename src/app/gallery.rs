use crate::upload::UploadTask;
use std::collections::VecDeque;

const DISPLAY_NAME_LIMIT: usize = 15;
const DISPLAY_NAME_KEEP: usize = 12;

/// Shortens long names for card headers: up to 15 chars pass through,
/// longer ones keep 12 chars and gain an ellipsis.
pub fn display_name(name: &str) -> String {
    if name.chars().count() <= DISPLAY_NAME_LIMIT {
        name.to_string()
    } else {
        let head: String = name.chars().take(DISPLAY_NAME_KEEP).collect();
        format!("{}...", head)
    }
}

#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub task: UploadTask,
}

impl GalleryEntry {
    pub fn display_name(&self) -> String {
        display_name(self.task.handle().name())
    }

    /// Cache key for the original thumbnail; unique per selected file.
    pub fn original_uri(&self) -> String {
        let handle = self.task.handle();
        format!("bytes://{}/{}", handle.id(), handle.name())
    }
}

/// Settled tasks, most recently settled first.
#[derive(Debug, Default)]
pub struct Gallery {
    entries: VecDeque<GalleryEntry>,
}

impl Gallery {
    pub fn push(&mut self, task: UploadTask) {
        self.entries.push_front(GalleryEntry { task });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GalleryEntry> {
        self.entries.iter()
    }
}
