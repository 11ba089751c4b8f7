use crate::error::InputError;
use crate::input::guard::ActivationGuard;
use crate::upload::FileHandle;
use ignore::WalkBuilder;
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

fn mime_for_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}

/// Guesses the MIME type from the name first, then from the content.
pub fn detect_mime(name: &str, bytes: &[u8]) -> Option<&'static str> {
    ImageFormat::from_path(name)
        .ok()
        .and_then(mime_for_format)
        .or_else(|| image::guess_format(bytes).ok().and_then(mime_for_format))
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn load_file(path: &Path) -> Result<FileHandle, InputError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| InputError::Unsupported(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mime = detect_mime(&name, &bytes).ok_or_else(|| InputError::Unsupported(path.to_path_buf()))?;
    Ok(FileHandle::new(name, bytes, mime))
}

/// Expands directories into their image files (sorted by name) and keeps
/// plain files in the order given.
pub fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        if !path.is_dir() {
            expanded.push(path.clone());
            continue;
        }
        let walker = WalkBuilder::new(path)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        for entry in walker.flatten() {
            let entry_path = entry.path();
            if entry_path.is_file() && is_supported_image(entry_path) {
                expanded.push(entry_path.to_path_buf());
            }
        }
    }
    expanded
}

pub fn collect_paths(paths: &[PathBuf]) -> Vec<FileHandle> {
    expand_paths(paths)
        .iter()
        .filter_map(|path| match load_file(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "skipping input");
                None
            }
        })
        .collect()
}

/// One selected item waiting to be read. Paths are read (and directories
/// walked) by [`resolve_sources`], which runs off the UI thread.
#[derive(Debug, Clone)]
pub enum InputSource {
    Path(PathBuf),
    Memory(FileHandle),
}

/// Turns sources into upload handles, keeping their order. Unreadable and
/// non-image entries are logged and skipped.
pub fn resolve_sources(sources: Vec<InputSource>) -> Vec<FileHandle> {
    let mut handles = Vec::with_capacity(sources.len());
    for source in sources {
        match source {
            InputSource::Path(path) => handles.extend(collect_paths(&[path])),
            InputSource::Memory(handle) => handles.push(handle),
        }
    }
    debug!(count = handles.len(), "resolved input files");
    handles
}

/// A file dropped onto the window. Native drops carry a path, web-style
/// drops carry the bytes directly.
#[derive(Debug, Clone)]
pub struct DroppedInput {
    pub name: String,
    pub path: Option<PathBuf>,
    pub bytes: Option<Arc<[u8]>>,
}

impl From<&egui::DroppedFile> for DroppedInput {
    fn from(file: &egui::DroppedFile) -> Self {
        Self {
            name: file.name.clone(),
            path: file.path.clone(),
            bytes: file.bytes.clone(),
        }
    }
}

pub struct InputCollector {
    guard: ActivationGuard,
    selection: Vec<FileHandle>,
    hovering: bool,
}

impl InputCollector {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            guard: ActivationGuard::new(cooldown),
            selection: Vec::new(),
            hovering: false,
        }
    }

    pub fn selection(&self) -> &[FileHandle] {
        &self.selection
    }

    /// Records the handles resolved from the latest picker or drop.
    pub fn set_selection(&mut self, handles: Vec<FileHandle>) {
        self.selection = handles;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    /// Runs `pick` unless a picker was opened within the cooldown. The
    /// previous selection is dropped before the picker opens. The cooldown
    /// restarts when `pick` returns, so clicks that queued up behind a modal
    /// dialog do not reopen it.
    pub fn request_picker<F>(&mut self, now: Instant, pick: F) -> Option<Vec<InputSource>>
    where
        F: FnOnce() -> Option<Vec<PathBuf>>,
    {
        if !self.guard.try_activate(now) {
            debug!("ignoring repeated picker activation");
            return None;
        }
        self.selection.clear();
        let picked = pick();
        self.guard.rearm(Instant::now());
        let paths = picked?;
        Some(paths.into_iter().map(InputSource::Path).collect())
    }

    pub fn accept_drop(&mut self, dropped: Vec<DroppedInput>) -> Vec<InputSource> {
        self.hovering = false;
        self.selection.clear();
        let mut sources = Vec::with_capacity(dropped.len());
        for input in dropped {
            match (input.path, input.bytes) {
                (Some(path), _) => sources.push(InputSource::Path(path)),
                (None, Some(bytes)) => match detect_mime(&input.name, &bytes) {
                    Some(mime) => {
                        sources.push(InputSource::Memory(FileHandle::new(input.name, bytes, mime)))
                    }
                    None => warn!(file = %input.name, "skipping dropped file that is not an image"),
                },
                (None, None) => warn!(file = %input.name, "dropped file has no path or contents"),
            }
        }
        sources
    }
}
