use eframe::egui::{self, Color32};

use super::state::{ImageSlot, ImageSource};
use super::RailAdminApp;

mod dialogs;
mod login;
mod news;
mod settings;
mod sidebar;

impl RailAdminApp {
    /// Draws an image bounded by `max_size`, queueing its download on first
    /// sight. Shows a spinner meanwhile and `-` when it cannot be loaded.
    pub(crate) fn show_image(
        &mut self,
        ui: &mut egui::Ui,
        source: &ImageSource,
        max_size: egui::Vec2,
        hover: &str,
    ) {
        match self.images.slot(ui.ctx(), source) {
            ImageSlot::Ready(texture) => {
                ui.add(egui::Image::from_texture(&texture).max_size(max_size))
                    .on_hover_text(hover);
            }
            ImageSlot::Loading => {
                ui.add(egui::Spinner::new().size(16.0));
            }
            ImageSlot::Failed(err) => {
                ui.label("-").on_hover_text(format!("Image indisponible : {err}"));
            }
        }
    }

    pub(crate) fn render_info_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.info_banner.clone() else {
            return;
        };
        let mut dismiss = false;
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(message.as_str());
                    if ui.small_button("✖").clicked() {
                        dismiss = true;
                    }
                });
            });
        if dismiss {
            self.info_banner = None;
        }
        ui.add_space(8.0);
    }
}

pub(crate) fn muted(text: impl Into<String>) -> egui::RichText {
    egui::RichText::new(text).color(Color32::GRAY)
}
