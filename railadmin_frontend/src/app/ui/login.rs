use eframe::egui::{self, RichText};

use crate::app::state::UiAction;
use crate::app::RailAdminApp;
use crate::shell::{find_link, LOGIN_ROUTE, NEWS_ROUTE};

use super::muted;

impl RailAdminApp {
    /// Sign-in happens in the external authentication service; this screen
    /// only tells the operator where they landed.
    pub(crate) fn render_login(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 4.0);
            ui.heading("Connexion administrateur");
            ui.add_space(12.0);
            ui.label("Cet espace est réservé aux administrateurs.");
            ui.label("Connectez-vous avec un compte administrateur pour accéder à la console.");
            ui.add_space(8.0);
            ui.label(muted(LOGIN_ROUTE).monospace());
        });
        None
    }

    pub(crate) fn render_placeholder(&mut self, ui: &mut egui::Ui, path: &str) -> Option<UiAction> {
        let mut action = None;
        match find_link(path) {
            Some(link) => ui.heading(format!("{}  {}", link.icon, link.label)),
            None => ui.heading(path),
        };
        ui.add_space(12.0);
        ui.label("Cet écran n'est pas disponible dans cette console.");
        ui.label(muted(path).monospace());
        ui.add_space(12.0);
        if ui.button(RichText::new("Gestion Actualités")).clicked() {
            action = Some(UiAction::Navigate(NEWS_ROUTE.to_string()));
        }
        action
    }
}
