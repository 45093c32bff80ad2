use chrono::{DateTime, NaiveDate, NaiveDateTime};
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};
use log::error;

use crate::app::state::{ImageSource, UiAction};
use crate::app::RailAdminApp;
use crate::config::AttachmentMode;
use crate::models::{Attachment, NewsId, NewsPost};
use crate::news::{NewsManager, SubmitStage};

use super::muted;

const COLUMNS: [&str; 6] = ["Titre", "Date", "Programmé", "Icône", "Fichiers joints", "Actions"];
const EMPTY_LIST: &str = "Aucune actualité enregistrée.";

impl RailAdminApp {
    pub(crate) fn render_news(
        &mut self,
        ui: &mut egui::Ui,
        manager: &mut NewsManager,
    ) -> Option<UiAction> {
        let mut action = None;
        // An open alert or confirmation blocks the page underneath.
        let blocked = manager.alert().is_some() || manager.pending_delete().is_some();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    ui.heading("Gestion des Actualités");
                    ui.add_space(12.0);
                    if let Some(form_action) = self.render_news_form(ui, manager) {
                        action = Some(form_action);
                    }
                    ui.add_space(24.0);
                    ui.heading("Actualités existantes");
                    ui.add_space(8.0);
                    // Rows stay read-only until the submission settles.
                    ui.add_enabled_ui(!manager.is_submitting(), |ui| {
                        self.render_news_table(ui, manager);
                    });
                });
            });

        action
    }

    fn render_news_form(&mut self, ui: &mut egui::Ui, manager: &mut NewsManager) -> Option<UiAction> {
        let mut action = None;
        let editing = manager.mode().is_editing();
        let submitting = manager.is_submitting();
        let local_mode = manager.attachment_mode() == AttachmentMode::Local;

        ui.group(|ui| {
            ui.add_enabled_ui(!submitting, |ui| {
                let form = manager.form_mut();

                ui.label("Titre");
                ui.add(egui::TextEdit::singleline(&mut form.title).desired_width(f32::INFINITY));
                ui.add_space(6.0);

                let mut scheduled = form.scheduled;
                if ui.checkbox(&mut scheduled, "Programmer la publication").changed() {
                    form.set_scheduled(scheduled);
                }
                ui.label(if form.date_required() { "Date *" } else { "Date" });
                ui.add_enabled(
                    form.date_enabled(),
                    egui::TextEdit::singleline(&mut form.date)
                        .hint_text("AAAA-MM-JJ")
                        .desired_width(160.0),
                );
                ui.add_space(6.0);

                ui.label("Contenu");
                ui.add(
                    egui::TextEdit::multiline(&mut form.content)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.label("Icône de l'article");
                ui.horizontal(|ui| {
                    if ui.button("Choisir une image…").clicked() {
                        action = Some(UiAction::PickIcon);
                    }
                    if let Some(icon) = &form.icon {
                        ui.label(muted(icon.name.as_str()));
                    }
                });
                if let Some(icon) = &form.icon {
                    let preview = ImageSource::Local(icon.path.clone());
                    self.show_image(ui, &preview, egui::vec2(100.0, 100.0), "Aperçu de l'icône");
                }
                ui.add_space(6.0);

                ui.label("Fichiers joints");
                if ui.button("Choisir des fichiers…").clicked() {
                    action = Some(UiAction::PickAttachments);
                }
                let mut renamed = Vec::new();
                for (index, file) in form.attachments.iter().enumerate() {
                    let mut name = file.name.clone();
                    ui.horizontal(|ui| {
                        if ui
                            .add(egui::TextEdit::singleline(&mut name).desired_width(280.0))
                            .on_hover_text(file.path.display().to_string())
                            .changed()
                        {
                            renamed.push((index, name));
                        }
                    });
                }
                for (index, name) in renamed {
                    form.rename_attachment(index, name);
                }
                if local_mode && form.has_pending_files() {
                    ui.label(muted("Les fichiers restent sur ce poste : les liens ne fonctionnent qu'ici."));
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                match manager.stage() {
                    Some(stage) => {
                        ui.add(egui::Spinner::new());
                        ui.label(stage_label(stage));
                    }
                    None => {
                        let label = if editing { "Mettre à jour" } else { "Créer" };
                        if ui.button(RichText::new(label).strong()).clicked() {
                            // A rejected form keeps its alert on the manager.
                            if let Ok(Some(command)) = manager.submit() {
                                action = Some(UiAction::Run(command));
                            }
                        }
                    }
                }
                if editing && !submitting && ui.button("Annuler").clicked() {
                    manager.cancel();
                }
            });
        });

        action
    }

    fn render_news_table(&mut self, ui: &mut egui::Ui, manager: &mut NewsManager) {
        if manager.posts().is_empty() {
            if manager.is_loading() {
                ui.add(egui::Spinner::new());
            } else {
                ui.label(EMPTY_LIST);
            }
            return;
        }

        let posts = manager.posts().to_vec();
        let mut edit: Option<NewsPost> = None;
        let mut delete: Option<NewsId> = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(200.0).at_least(120.0))
            .column(Column::auto().at_least(80.0))
            .column(Column::auto())
            .column(Column::exact(60.0))
            .column(Column::initial(220.0).at_least(120.0))
            .column(Column::remainder().at_least(160.0))
            .header(24.0, |mut header| {
                for title in COLUMNS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for post in &posts {
                    body.row(row_height(post), |mut row| {
                        row.col(|ui| {
                            ui.label(RichText::new(&post.title).strong());
                        });
                        row.col(|ui| {
                            ui.label(display_date(post.date.as_deref()));
                        });
                        row.col(|ui| {
                            ui.label(if post.scheduled { "Oui" } else { "Non" });
                        });
                        row.col(|ui| match &post.icon {
                            Some(icon) => {
                                let source = ImageSource::Remote(self.api.resolve_url(icon));
                                self.show_image(ui, &source, egui::vec2(50.0, 50.0), "Icon");
                            }
                            None => {
                                ui.label("-");
                            }
                        });
                        row.col(|ui| {
                            if post.attachments.is_empty() {
                                ui.label("-");
                            } else {
                                ui.vertical(|ui| {
                                    for attachment in &post.attachments {
                                        self.attachment_link(ui, attachment);
                                    }
                                });
                            }
                        });
                        row.col(|ui| {
                            if ui.button("Modifier").clicked() {
                                edit = Some(post.clone());
                            }
                            if ui
                                .add_enabled(post.id.is_some(), egui::Button::new("Supprimer"))
                                .clicked()
                            {
                                delete = post.id.clone();
                            }
                        });
                    });
                }
            });

        if let Some(post) = edit {
            manager.begin_edit(&post);
        }
        if let Some(id) = delete {
            manager.request_delete(id);
        }
    }

    /// Attachments open in the system browser or file viewer.
    fn attachment_link(&self, ui: &mut egui::Ui, attachment: &Attachment) {
        let url = self.api.resolve_url(&attachment.url);
        if ui.link(attachment.name.as_str()).on_hover_text(url.as_str()).clicked() {
            if let Err(err) = open::that(&url) {
                error!("failed to open {url}: {err}");
            }
        }
    }
}

fn stage_label(stage: SubmitStage) -> String {
    match stage {
        SubmitStage::Uploading { files } => format!("Envoi de {files} fichier(s)…"),
        SubmitStage::Saving => "Enregistrement…".to_string(),
    }
}

fn row_height(post: &NewsPost) -> f32 {
    let lines = post.attachments.len().max(1) as f32;
    let text = 20.0 * lines + 8.0;
    if post.icon.is_some() {
        text.max(58.0)
    } else {
        text.max(28.0)
    }
}

/// `dd/mm/YYYY` for any date the server sends; unparsable dates show nothing.
pub(crate) fn display_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return String::new();
    };
    const FORMAT: &str = "%d/%m/%Y";
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.format(FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|date| date.format(FORMAT).to_string())
        .unwrap_or_default()
}
