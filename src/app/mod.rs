mod gallery;
mod state;
mod ui;

use crate::config::UploaderConfig;
use crate::input::{resolve_sources, DroppedInput, InputCollector, InputSource, IMAGE_EXTENSIONS};
use crate::theme::{Theme, ThemePreference};
use crate::upload::{
    download_to, suggested_file_name, BackgroundRemovalClient, BatchPipeline, FileHandle,
    PipelineEvent, PipelineSink,
};
use eframe::{egui, App};
pub use gallery::{display_name, Gallery, GalleryEntry};
use rfd::FileDialog;
pub use state::{ActionProgress, DownloadOutcome, UploadState};
use std::sync::mpsc as std_mpsc;
use std::sync::Mutex;
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// Forwards pipeline events to the UI thread and wakes it up.
struct ChannelSink {
    sender: Mutex<std_mpsc::Sender<PipelineEvent>>,
    ctx: egui::Context,
}

impl PipelineSink for ChannelSink {
    fn on_event(&self, event: PipelineEvent) {
        if let Ok(sender) = self.sender.lock() {
            sender.send(event).unwrap_or_default();
        }
        self.ctx.request_repaint();
    }
}

pub struct BgRemoverApp {
    config: UploaderConfig,
    runtime: Handle,
    client: BackgroundRemovalClient,
    collector: InputCollector,
    theme: ThemePreference,
    state: UploadState,
    download_sender: std_mpsc::Sender<DownloadOutcome>,
    download_receiver: std_mpsc::Receiver<DownloadOutcome>,
    load_sender: std_mpsc::Sender<Vec<FileHandle>>,
    load_receiver: std_mpsc::Receiver<Vec<FileHandle>>,
}

impl BgRemoverApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: UploaderConfig, runtime: Handle) -> Self {
        info!(endpoint = %config.endpoint, batch_width = config.batch_width, "initializing uploader");
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let system = cc.integration_info.system_theme.map(Theme::from);
        let theme = ThemePreference::load(cc.storage, system);
        theme.apply(&cc.egui_ctx);

        let (download_sender, download_receiver) = std_mpsc::channel();
        let (load_sender, load_receiver) = std_mpsc::channel();
        Self {
            client: BackgroundRemovalClient::new(config.base_url()),
            collector: InputCollector::new(config.picker_cooldown),
            config,
            runtime,
            theme,
            state: UploadState::default(),
            download_sender,
            download_receiver,
            load_sender,
            load_receiver,
        }
    }

    /// Opens the native picker unless this click was already handled.
    /// `now` is the frame's click time, shared by every click target.
    pub fn open_picker(&mut self, ctx: &egui::Context, now: Instant) {
        let picked = self.collector.request_picker(now, || {
            FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_files()
        });
        if let Some(sources) = picked {
            self.load_inputs(ctx, sources);
        }
    }

    /// Reads the selected files on the runtime's blocking pool. The handles
    /// come back through `load_receiver` and start the upload from there.
    fn load_inputs(&mut self, ctx: &egui::Context, sources: Vec<InputSource>) {
        if self.state.is_uploading() {
            warn!(count = sources.len(), "upload already running, ignoring new selection");
            self.state.error_message =
                Some("Please wait for the current upload to finish".to_string());
            return;
        }

        self.state.loads_in_flight += 1;
        let sender = self.load_sender.clone();
        let ctx = ctx.clone();
        self.runtime.spawn_blocking(move || {
            let files = resolve_sources(sources);
            sender.send(files).unwrap_or_default();
            ctx.request_repaint();
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw
                    .dropped_files
                    .iter()
                    .map(DroppedInput::from)
                    .collect::<Vec<_>>(),
            )
        });
        self.collector.set_hovering(hovering);
        if !dropped.is_empty() {
            let sources = self.collector.accept_drop(dropped);
            self.load_inputs(ctx, sources);
        }
    }

    pub fn start_upload(&mut self, ctx: &egui::Context, files: Vec<FileHandle>) {
        if files.is_empty() {
            warn!("no usable images in selection");
            self.state.error_message = Some("No supported images selected".to_string());
            return;
        }
        if self.state.is_uploading() {
            warn!(count = files.len(), "upload already running, ignoring new selection");
            self.state.error_message =
                Some("Please wait for the current upload to finish".to_string());
            return;
        }

        info!(count = files.len(), "starting upload");
        let (sender, receiver) = std_mpsc::channel();
        self.state.event_receiver = Some(receiver);
        self.state.apply_event(PipelineEvent::Started { total: files.len() }, Instant::now());

        let sink = ChannelSink {
            sender: Mutex::new(sender),
            ctx: ctx.clone(),
        };
        let pipeline = BatchPipeline::new(self.client.clone(), self.config.batch_width);
        self.runtime.spawn(async move {
            pipeline.run(files, &sink).await;
        });
    }

    pub fn start_download(&mut self, ctx: &egui::Context, locator: String, original_name: &str) {
        let Some(path) = FileDialog::new()
            .set_file_name(suggested_file_name(original_name))
            .save_file()
        else {
            return;
        };

        self.state.downloads_in_flight += 1;
        let client = self.client.http().clone();
        let sender = self.download_sender.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = download_to(&client, &locator, &path).await.map_err(|e| {
                error!(locator = %locator, error = %e, "download failed");
                e.to_string()
            });
            sender
                .send(DownloadOutcome { path, result })
                .unwrap_or_default();
            ctx.request_repaint();
        });
    }

    pub fn clear_gallery(&mut self) {
        info!(entries = self.state.gallery.len(), "clearing gallery");
        self.state.gallery.clear();
    }

    pub fn toggle_theme(&mut self, ctx: &egui::Context) {
        let theme = self.theme.toggle();
        info!(theme = theme.as_str(), "theme toggled");
        self.theme.apply(ctx);
    }

    pub fn open_last_download(&self) {
        if let Some(path) = &self.state.last_download {
            if let Err(e) = open::that(path) {
                warn!(path = %path.display(), error = %e, "could not open saved image");
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context, system_theme: Option<Theme>) {
        let now = Instant::now();

        // eframe may swap visuals on a system theme change; the preference wins.
        self.theme.follow_system(system_theme);
        if ctx.style().visuals.dark_mode != (self.theme.theme() == Theme::Dark) {
            self.theme.apply(ctx);
        }

        self.handle_dropped_files(ctx);

        if let Some(receiver) = &self.state.event_receiver {
            let events: Vec<PipelineEvent> = receiver.try_iter().collect();
            for event in events {
                self.state.apply_event(event, now);
            }
        }

        while let Ok(files) = self.load_receiver.try_recv() {
            self.state.loads_in_flight = self.state.loads_in_flight.saturating_sub(1);
            self.collector.set_selection(files.clone());
            self.start_upload(ctx, files);
        }

        while let Ok(outcome) = self.download_receiver.try_recv() {
            self.state.apply_download(outcome);
        }

        if let Some(remaining) = self.state.tick(now, self.config.progress_hide_delay) {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl App for BgRemoverApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let system_theme = frame.info().system_theme.map(Theme::from);
        self.update_state(ctx, system_theme);
        self.render(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.theme.persist(storage);
    }
}
