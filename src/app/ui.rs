use super::gallery::GalleryEntry;
use super::BgRemoverApp;
use crate::input::IMAGE_EXTENSIONS;
use crate::upload::TaskStatus;
use crate::utils::file_size::format_size;
use crate::utils::palette::{self, ACCENT, ERROR, SUCCESS};
use eframe::egui::{self, Align, Align2, Layout, RichText, Stroke};
use std::time::Instant;

const THUMBNAIL_SIZE: f32 = 160.0;

impl BgRemoverApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    self.render_header(ui, ctx);
                    ui.add_space(20.0);
                    self.render_drop_zone(ui, ctx);
                    ui.add_space(24.0);
                    self.render_gallery(ui, ctx);
                    ui.add_space(20.0);
                    self.render_footer(ui);
                    ui.add_space(10.0);
                });
        });

        self.render_progress(ctx);
        self.render_alert(ctx);
    }

    fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut toggle = false;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading("Background Remover");
                ui.label(
                    RichText::new("Drop your images and get them back without a background")
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            });
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let icon = self.theme.theme().toggle_icon();
                if ui
                    .button(RichText::new(icon).size(18.0))
                    .on_hover_text("Toggle light/dark theme")
                    .clicked()
                {
                    toggle = true;
                }
            });
        });
        if toggle {
            self.toggle_theme(ctx);
        }
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let dark = ui.visuals().dark_mode;
        let enabled = !self.state.is_uploading() && self.state.loads_in_flight == 0;
        let (fill, stroke) = if self.collector.is_hovering() {
            (palette::wash(ACCENT, dark), Stroke::new(2.0, ACCENT))
        } else {
            (
                ui.visuals().faint_bg_color,
                Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
            )
        };

        let mut button_clicked = false;
        let zone = egui::Frame::none()
            .fill(fill)
            .stroke(stroke)
            .rounding(12.0)
            .inner_margin(28.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("Drag & drop images here").size(18.0).strong());
                    ui.add_space(6.0);
                    ui.label("or");
                    ui.add_space(6.0);
                    ui.add_enabled_ui(enabled, |ui| {
                        let button = egui::Button::new(RichText::new("🖼 Select Images").strong())
                            .fill(ACCENT)
                            .min_size(egui::vec2(200.0, 40.0));
                        if ui.add(button).clicked() {
                            button_clicked = true;
                        }
                    });
                    if self.state.loads_in_flight > 0 {
                        ui.add_space(6.0);
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Reading files...");
                        });
                    }
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(format!("Supported: {}", IMAGE_EXTENSIONS.join(", ")))
                            .small()
                            .color(ui.visuals().weak_text_color()),
                    );
                });
            })
            .response
            .interact(egui::Sense::click());

        // Button and surrounding zone can both report the same click.
        let now = Instant::now();
        if button_clicked {
            self.open_picker(ctx, now);
        }
        if enabled && zone.clicked() {
            self.open_picker(ctx, now);
        }
    }

    fn render_gallery(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut clear = false;
        let header = ui
            .horizontal(|ui| {
                ui.heading(format!("Results ({})", self.state.gallery.len()));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let button = egui::Button::new("🗑 Clear All");
                    if ui.add_enabled(!self.state.gallery.is_empty(), button).clicked() {
                        clear = true;
                    }
                });
            })
            .response;

        if self.state.scroll_to_results {
            header.scroll_to_me(Some(Align::TOP));
            self.state.scroll_to_results = false;
        }

        ui.add_space(10.0);
        if self.state.gallery.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("Processed images will appear here")
                        .color(ui.visuals().weak_text_color()),
                );
            });
        }

        let mut download = None;
        for entry in self.state.gallery.iter() {
            if let Some(request) = render_card(ui, entry) {
                download = Some(request);
            }
            ui.add_space(12.0);
        }

        if clear {
            self.clear_gallery();
        }
        if let Some((locator, name)) = download {
            self.start_download(ctx, locator, &name);
        }
    }

    fn render_progress(&mut self, ctx: &egui::Context) {
        if !self.state.is_progress_visible() {
            return;
        }
        egui::Window::new("Removing backgrounds")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                let progress_bar = egui::ProgressBar::new(self.state.get_progress_percentage())
                    .show_percentage()
                    .animate(self.state.is_uploading())
                    .fill(ACCENT);
                ui.add(progress_bar);
                ui.add_space(6.0);
                ui.label(self.state.get_status_text());
            });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.alert.clone() else {
            return;
        };
        egui::Window::new("⚠ Something went wrong")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.state.alert = None;
                    }
                });
            });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!(
                    "Endpoint: {} | {} uploads at a time",
                    self.config.base_url(),
                    self.config.batch_width
                ))
                .small()
                .color(ui.visuals().weak_text_color()),
            );

            if self.state.downloads_in_flight > 0 {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Downloading {}...", self.state.downloads_in_flight));
                });
            }

            if let Some(path) = &self.state.last_download {
                let saved = egui::Label::new(
                    RichText::new(format!("Saved {}", path.display())).color(SUCCESS),
                )
                .sense(egui::Sense::click());
                if ui.add(saved).on_hover_text("Open image").clicked() {
                    self.open_last_download();
                }
            }

            if let Some(error) = &self.state.error_message {
                ui.add_space(5.0);
                ui.colored_label(ERROR, error);
            }
        });
    }
}

/// Draws one result card. Returns `(locator, original name)` when the user
/// asked to download it.
fn render_card(ui: &mut egui::Ui, entry: &GalleryEntry) -> Option<(String, String)> {
    let mut download = None;
    let handle = entry.task.handle();

    egui::Frame::group(ui.style())
        .rounding(10.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(entry.display_name()).strong())
                    .on_hover_text(handle.name());
                ui.label(
                    RichText::new(format_size(handle.size()))
                        .small()
                        .color(ui.visuals().weak_text_color()),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    status_badge(ui, entry.task.status());
                });
            });
            ui.add_space(8.0);

            match entry.task.status() {
                TaskStatus::Succeeded { locator } => {
                    ui.columns(2, |columns| {
                        let original =
                            egui::Image::from_bytes(entry.original_uri(), handle.bytes().clone());
                        thumbnail(&mut columns[0], original, "Before");
                        thumbnail(&mut columns[1], egui::Image::new(locator.as_str()), "After");
                    });
                    ui.add_space(8.0);
                    let button = egui::Button::new(RichText::new("Download").strong()).fill(ACCENT);
                    if ui.add_sized([ui.available_width(), 32.0], button).clicked() {
                        download = Some((locator.clone(), handle.name().to_string()));
                    }
                }
                TaskStatus::Failed { error } => {
                    ui.colored_label(ERROR, error);
                }
                TaskStatus::Pending => {
                    ui.spinner();
                }
            }
        });

    download
}

fn thumbnail(ui: &mut egui::Ui, image: egui::Image<'_>, caption: &str) {
    ui.vertical_centered(|ui| {
        ui.add(
            image
                .max_size(egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE))
                .rounding(6.0),
        );
        ui.label(
            RichText::new(caption)
                .small()
                .color(ui.visuals().weak_text_color()),
        );
    });
}

fn status_badge(ui: &mut egui::Ui, status: &TaskStatus) {
    let dark = ui.visuals().dark_mode;
    let (text, color) = match status {
        TaskStatus::Succeeded { .. } => ("Completed", SUCCESS),
        TaskStatus::Failed { .. } => ("Failed", ERROR),
        TaskStatus::Pending => ("Processing", ACCENT),
    };
    egui::Frame::none()
        .fill(palette::wash(color, dark))
        .rounding(12.0)
        .inner_margin(egui::Margin::symmetric(12.0, 4.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).strong());
        });
}
