use eframe::egui::{self, Align2, Color32, Context};

use crate::app::state::UiAction;
use crate::app::RailAdminApp;
use crate::news::{NewsManager, DELETE_CONFIRMATION};

impl RailAdminApp {
    /// The validation alert and the delete confirmation of the news page.
    pub(crate) fn render_news_dialogs(
        &mut self,
        ctx: &Context,
        manager: &mut NewsManager,
    ) -> Option<UiAction> {
        if let Some(alert) = manager.alert() {
            let mut dismiss = false;
            egui::Window::new("Attention")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.colored_label(Color32::from_rgb(180, 40, 40), alert.to_string());
                    for field in &alert.missing {
                        ui.label(format!("• {field}"));
                    }
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        dismiss = true;
                    }
                });
            if dismiss {
                manager.dismiss_alert();
            }
            return None;
        }

        manager.pending_delete()?;
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Confirmation")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(DELETE_CONFIRMATION);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Annuler").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            return manager.confirm_delete().map(UiAction::Run);
        }
        if cancelled {
            manager.dismiss_delete();
        }
        None
    }
}
