use super::gallery::Gallery;
use crate::upload::{PipelineEvent, ProgressState};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub enum ActionProgress {
    #[default]
    NotStarted,
    Uploading {
        progress: ProgressState,
        batch: usize,
        current_file: Option<String>,
        successful: usize,
        failed: usize,
    },
    Completed {
        progress: ProgressState,
        successful: usize,
        failed: usize,
        finished_at: Instant,
    },
}

#[derive(Debug)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub result: Result<u64, String>,
}

#[derive(Default)]
pub struct UploadState {
    pub progress: ActionProgress,
    pub gallery: Gallery,
    pub error_message: Option<String>,
    /// Blocking notification shown in a modal until dismissed.
    pub alert: Option<String>,
    pub last_download: Option<PathBuf>,
    pub downloads_in_flight: usize,
    /// Selections still being read from disk.
    pub loads_in_flight: usize,
    pub scroll_to_results: bool,
    pub event_receiver: Option<Receiver<PipelineEvent>>,
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self.progress, ActionProgress::Uploading { .. })
    }

    pub fn is_progress_visible(&self) -> bool {
        !matches!(self.progress, ActionProgress::NotStarted)
    }

    pub fn apply_event(&mut self, event: PipelineEvent, now: Instant) {
        match event {
            PipelineEvent::Started { total } => {
                self.error_message = None;
                self.progress = ActionProgress::Uploading {
                    progress: ProgressState::start(total),
                    batch: 0,
                    current_file: None,
                    successful: 0,
                    failed: 0,
                };
            }
            PipelineEvent::BatchStarted { index, .. } => {
                if let ActionProgress::Uploading { batch, .. } = &mut self.progress {
                    *batch = index + 1;
                }
            }
            PipelineEvent::TaskSettled { task, progress } => {
                if let ActionProgress::Uploading {
                    progress: current,
                    current_file,
                    successful,
                    failed,
                    ..
                } = &mut self.progress
                {
                    *current = progress;
                    *current_file = Some(task.handle().name().to_string());
                    if task.error_message().is_some() {
                        *failed += 1;
                    } else {
                        *successful += 1;
                    }
                }
                self.gallery.push(task);
            }
            PipelineEvent::Finished { progress } => {
                let (successful, failed) = match &self.progress {
                    ActionProgress::Uploading {
                        successful, failed, ..
                    } => (*successful, *failed),
                    _ => (0, 0),
                };
                if failed > 0 {
                    self.error_message = Some(format!(
                        "Completed with {} failed upload(s). See the gallery for details.",
                        failed
                    ));
                }
                self.progress = ActionProgress::Completed {
                    progress,
                    successful,
                    failed,
                    finished_at: now,
                };
                self.scroll_to_results = true;
                self.event_receiver = None;
            }
        }
    }

    /// Hides the finished progress window once `hide_delay` has passed.
    /// Returns how long until that happens, if it is still pending.
    pub fn tick(&mut self, now: Instant, hide_delay: Duration) -> Option<Duration> {
        if let ActionProgress::Completed { finished_at, .. } = &self.progress {
            let elapsed = now.saturating_duration_since(*finished_at);
            if elapsed >= hide_delay {
                self.progress = ActionProgress::NotStarted;
                return None;
            }
            return Some(hide_delay - elapsed);
        }
        None
    }

    pub fn apply_download(&mut self, outcome: DownloadOutcome) {
        self.downloads_in_flight = self.downloads_in_flight.saturating_sub(1);
        match outcome.result {
            Ok(_) => self.last_download = Some(outcome.path),
            Err(e) => self.alert = Some(format!("Download failed: {}", e)),
        }
    }

    pub fn get_progress_percentage(&self) -> f32 {
        match &self.progress {
            ActionProgress::NotStarted => 0.0,
            ActionProgress::Uploading { progress, .. } => progress.fraction(),
            ActionProgress::Completed { progress, .. } => {
                if progress.total == 0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    pub fn get_status_text(&self) -> String {
        match &self.progress {
            ActionProgress::NotStarted => String::new(),
            ActionProgress::Uploading {
                progress,
                current_file: Some(name),
                ..
            } => format!(
                "Processing {} of {}: {}",
                progress.processed, progress.total, name
            ),
            ActionProgress::Uploading { progress, batch, .. } => format!(
                "Uploading batch {} | 0 of {} done",
                batch, progress.total
            ),
            ActionProgress::Completed {
                progress,
                successful,
                failed,
                ..
            } => format!(
                "Done: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
                progress.processed, progress.total, successful, failed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::upload::{FileHandle, UploadTask};

    fn task(name: &str, outcome: Result<String, UploadError>) -> UploadTask {
        let mut task = UploadTask::new(FileHandle::new(name, b"x".to_vec(), "image/png"));
        task.settle(outcome);
        task
    }

    fn settled(state: &mut UploadState, name: &str, ok: bool, processed: usize, total: usize) {
        let outcome = if ok {
            Ok(format!("http://bg.test/{name}"))
        } else {
            Err(UploadError::TransportFailure { status: 500 })
        };
        state.apply_event(
            PipelineEvent::TaskSettled {
                task: task(name, outcome),
                progress: ProgressState { processed, total },
            },
            Instant::now(),
        );
    }

    #[test]
    fn full_run_fills_gallery_and_completes() {
        let mut state = UploadState::default();
        let now = Instant::now();
        state.apply_event(PipelineEvent::Started { total: 5 }, now);
        state.apply_event(PipelineEvent::BatchStarted { index: 0, size: 3 }, now);
        settled(&mut state, "b.png", true, 1, 5);
        settled(&mut state, "a.png", false, 2, 5);
        settled(&mut state, "c.png", true, 3, 5);
        assert_eq!(state.get_status_text(), "Processing 3 of 5: c.png");
        state.apply_event(PipelineEvent::BatchStarted { index: 1, size: 2 }, now);
        settled(&mut state, "d.png", true, 4, 5);
        settled(&mut state, "e.png", true, 5, 5);
        state.apply_event(
            PipelineEvent::Finished {
                progress: ProgressState { processed: 5, total: 5 },
            },
            now,
        );

        assert_eq!(state.gallery.len(), 5);
        let first = state.gallery.iter().next().unwrap();
        assert_eq!(first.task.handle().name(), "e.png");
        assert_eq!(state.get_progress_percentage(), 1.0);
        assert!(state.scroll_to_results);
        assert!(state.error_message.as_deref().unwrap().contains("1 failed"));
        match &state.progress {
            ActionProgress::Completed { successful, failed, .. } => {
                assert_eq!((*successful, *failed), (4, 1));
            }
            other => panic!("unexpected progress {other:?}"),
        }

        let failure = state
            .gallery
            .iter()
            .find(|e| e.task.handle().name() == "a.png")
            .unwrap();
        assert!(failure.task.error_message().unwrap().contains("500"));
    }

    #[test]
    fn progress_window_hides_after_delay() {
        let mut state = UploadState::default();
        let finished = Instant::now();
        state.apply_event(PipelineEvent::Started { total: 1 }, finished);
        state.apply_event(
            PipelineEvent::Finished {
                progress: ProgressState { processed: 1, total: 1 },
            },
            finished,
        );

        let delay = Duration::from_millis(500);
        let remaining = state.tick(finished + Duration::from_millis(200), delay);
        assert_eq!(remaining, Some(Duration::from_millis(300)));
        assert!(state.is_progress_visible());

        assert_eq!(state.tick(finished + delay, delay), None);
        assert!(!state.is_progress_visible());
        assert_eq!(state.get_progress_percentage(), 0.0);
    }

    #[test]
    fn clear_all_leaves_gallery_empty() {
        let mut state = UploadState::default();
        state.apply_event(PipelineEvent::Started { total: 3 }, Instant::now());
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            settled(&mut state, name, true, i + 1, 3);
        }
        state.gallery.clear();
        assert!(state.gallery.is_empty());
    }

    #[test]
    fn failed_download_alerts_without_touching_gallery() {
        let mut state = UploadState::default();
        state.apply_event(PipelineEvent::Started { total: 1 }, Instant::now());
        settled(&mut state, "a.png", true, 1, 1);
        state.downloads_in_flight = 1;

        state.apply_download(DownloadOutcome {
            path: PathBuf::from("/tmp/processed_a.png"),
            result: Err("Download failed with status: 404".to_string()),
        });

        assert_eq!(state.gallery.len(), 1);
        assert!(state.alert.as_deref().unwrap().contains("404"));
        assert!(state.last_download.is_none());
        assert_eq!(state.downloads_in_flight, 0);
    }

    #[test]
    fn successful_download_remembers_path() {
        let mut state = UploadState::default();
        state.apply_download(DownloadOutcome {
            path: PathBuf::from("/tmp/processed_a.png"),
            result: Ok(42),
        });
        assert_eq!(state.last_download, Some(PathBuf::from("/tmp/processed_a.png")));
        assert!(state.alert.is_none());
    }
}
