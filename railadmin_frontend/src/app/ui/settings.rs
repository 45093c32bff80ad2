use eframe::egui;

use crate::app::state::UiAction;
use crate::app::RailAdminApp;

impl RailAdminApp {
    pub(crate) fn render_settings(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;
        ui.heading("⚙ Paramètres");
        ui.add_space(20.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.group(|ui| {
                ui.heading("Configuration de l'API");
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    ui.label("URL du serveur :");
                    ui.text_edit_singleline(&mut self.base_url_input);
                });

                ui.add_space(5.0);

                ui.horizontal(|ui| {
                    if ui.button("Appliquer").clicked() {
                        action = Some(UiAction::ApplyBaseUrl);
                    }
                    if ui.button("Valeur par défaut").clicked() {
                        self.base_url_input = self.config.api_url.clone();
                    }
                });

                ui.add_space(5.0);
                ui.label(
                    egui::RichText::new("⚠ Changer l'URL recharge la page courante depuis le nouveau serveur")
                        .small()
                        .color(egui::Color32::GRAY),
                );
            });

            ui.add_space(20.0);

            ui.group(|ui| {
                ui.heading("Session");
                ui.add_space(10.0);
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([40.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label("Rôle");
                        ui.label(self.session.role().unwrap_or("-"));
                        ui.end_row();

                        ui.label("Fichiers joints");
                        ui.label(self.config.attachment_mode.to_string());
                        ui.end_row();

                        ui.label("Délai HTTP");
                        ui.label(format!("{} s", self.config.http_timeout.as_secs()));
                        ui.end_row();
                    });
            });
        });

        ui.add_space(20.0);

        if ui.button("← Retour").clicked() {
            let back = self
                .shell
                .as_ref()
                .map(|shell| shell.current_path().to_string())
                .unwrap_or_else(|| self.config.start_route.clone());
            action = Some(UiAction::Navigate(back));
        }
        action
    }
}
