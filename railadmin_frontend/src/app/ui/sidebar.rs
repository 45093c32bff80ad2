use eframe::egui::{self, RichText};

use crate::app::state::{ImageSource, UiAction};
use crate::app::RailAdminApp;
use crate::shell::{
    NavEntry, NavLink, NavigationShell, DASHBOARD_ROUTE, LOGOUT_LABEL, NAV_SECTIONS,
};

const LOGO_SIZE: f32 = 40.0;

impl RailAdminApp {
    pub(crate) fn render_sidebar(
        &mut self,
        ui: &mut egui::Ui,
        shell: &mut NavigationShell,
    ) -> Option<UiAction> {
        let mut action = None;

        ui.add_space(12.0);
        let header = ui.horizontal(|ui| {
            let logo = ImageSource::Remote(self.api.resolve_url(&shell.branding().logo_url));
            self.show_image(ui, &logo, egui::vec2(LOGO_SIZE, LOGO_SIZE), "Logo");
            let theme = shell.theme();
            ui.label(
                RichText::new(&theme.branding().company_name)
                    .heading()
                    .strong()
                    .family(theme.font_family())
                    .color(theme.primary_color()),
            );
        });
        if header
            .response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .clicked()
        {
            action = Some(UiAction::Navigate(DASHBOARD_ROUTE.to_string()));
        }
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(ui.available_height() - 40.0)
            .show(ui, |ui| {
                for section in NAV_SECTIONS {
                    if let Some(title) = section.title {
                        ui.add_space(10.0);
                        ui.label(RichText::new(title.to_uppercase()).small().weak());
                    }
                    for entry in section.entries {
                        match entry {
                            NavEntry::Link(link) => {
                                if nav_button(ui, shell, link, 0.0) {
                                    action = Some(UiAction::Navigate(link.path.to_string()));
                                }
                            }
                            NavEntry::Group { label, icon, links } => {
                                let arrow = if shell.announcements_open() { "▾" } else { "▸" };
                                if ui
                                    .selectable_label(false, format!("{icon}  {label}  {arrow}"))
                                    .clicked()
                                {
                                    shell.toggle_announcements();
                                }
                                if shell.announcements_open() {
                                    for link in links.iter() {
                                        if nav_button(ui, shell, link, 16.0) {
                                            action =
                                                Some(UiAction::Navigate(link.path.to_string()));
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button(format!("⎋  {LOGOUT_LABEL}")).clicked() {
                    action = Some(UiAction::Logout);
                }
                if ui.small_button("⚙").on_hover_text("Paramètres").clicked() {
                    action = Some(UiAction::OpenSettings);
                }
            });
            ui.separator();
        });

        action
    }
}

fn nav_button(ui: &mut egui::Ui, shell: &NavigationShell, link: &NavLink, indent: f32) -> bool {
    let active = shell.is_active(link);
    ui.horizontal(|ui| {
        ui.add_space(indent);
        let mut text = RichText::new(format!("{}  {}", link.icon, link.label));
        if active {
            text = text.strong().color(shell.theme().primary_color());
        }
        ui.selectable_label(active, text).clicked()
    })
    .inner
}
