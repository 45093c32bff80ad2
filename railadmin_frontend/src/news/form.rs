use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use thiserror::Error;

use crate::models::{Attachment, NewsPost};

/// A file picked on disk but not yet turned into a reference. The display
/// name can diverge from the on-disk name; the bytes always come from `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
}

impl PendingFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            name: name.into(),
        }
    }

    /// `file://` URL of the picked file. Only meaningful on this machine and
    /// for as long as the file stays where it is.
    pub fn local_url(&self) -> Result<String> {
        let absolute = absolute_path(&self.path)?;
        Url::from_file_path(&absolute)
            .map(|url| url.to_string())
            .map_err(|_| anyhow!("cannot build a file URL for {}", absolute.display()))
    }

    pub fn to_local_attachment(&self) -> Result<Attachment> {
        Ok(Attachment {
            name: self.name.clone(),
            url: self.local_url()?,
        })
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(path))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Content,
    Date,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequiredField::Title => "Titre",
            RequiredField::Content => "Contenu",
            RequiredField::Date => "Date",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Veuillez remplir tous les champs requis.")]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

/// Editable mirror of a post. Files are still local handles here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewsForm {
    pub title: String,
    pub date: String,
    pub scheduled: bool,
    pub content: String,
    pub icon: Option<PendingFile>,
    pub attachments: Vec<PendingFile>,
}

impl NewsForm {
    /// Copies the text fields of a stored post. Stored files are not
    /// re-fetched, so the file fields start empty.
    pub fn from_post(post: &NewsPost) -> Self {
        Self {
            title: post.title.clone(),
            date: post.date.clone().unwrap_or_default(),
            scheduled: post.scheduled,
            content: post.content.clone(),
            icon: None,
            attachments: Vec::new(),
        }
    }

    pub fn date_enabled(&self) -> bool {
        self.scheduled
    }

    pub fn date_required(&self) -> bool {
        self.scheduled
    }

    /// Leaves `date` alone in both directions.
    pub fn set_scheduled(&mut self, scheduled: bool) {
        self.scheduled = scheduled;
    }

    pub fn select_icon(&mut self, file: PendingFile) {
        self.icon = Some(file);
    }

    /// A new selection replaces the pending list, it never merges.
    pub fn select_attachments(&mut self, files: Vec<PendingFile>) {
        self.attachments = files;
    }

    pub fn rename_attachment(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.attachments.get_mut(index) {
            Some(slot) => {
                *slot = slot.renamed(name);
                true
            }
            None => false,
        }
    }

    pub fn has_pending_files(&self) -> bool {
        self.icon.is_some() || !self.attachments.is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(RequiredField::Title);
        }
        if self.content.is_empty() {
            missing.push(RequiredField::Content);
        }
        if self.date_required() && self.date.is_empty() {
            missing.push(RequiredField::Date);
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> NewsForm {
        NewsForm {
            title: "Fermeture gare".into(),
            content: "La gare ferme à 22h".into(),
            ..NewsForm::default()
        }
    }

    #[test]
    fn test_validate_requires_title_and_content() {
        assert!(filled().validate().is_ok());

        let err = NewsForm::default().validate().unwrap_err();
        assert_eq!(err.missing, vec![RequiredField::Title, RequiredField::Content]);
        assert_eq!(err.to_string(), "Veuillez remplir tous les champs requis.");
    }

    #[test]
    fn test_validate_requires_date_only_when_scheduled() {
        let mut form = filled();
        form.set_scheduled(true);
        assert_eq!(form.validate().unwrap_err().missing, vec![RequiredField::Date]);

        form.date = "2026-11-02".into();
        assert!(form.validate().is_ok());

        form.date.clear();
        form.set_scheduled(false);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_whitespace_is_not_empty() {
        let form = NewsForm {
            title: " ".into(),
            content: " ".into(),
            ..NewsForm::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_scheduled_toggle_keeps_date_and_controls_input() {
        let mut form = filled();
        form.set_scheduled(true);
        assert!(form.date_enabled());
        assert!(form.date_required());
        assert_eq!(form.date, "");

        form.date = "2026-12-24".into();
        form.set_scheduled(false);
        assert!(!form.date_enabled());
        assert!(!form.date_required());
        assert_eq!(form.date, "2026-12-24");
    }

    #[test]
    fn test_attachment_selection_replaces_previous_list() {
        let mut form = filled();
        form.select_attachments(vec![
            PendingFile::from_path("/tmp/horaires.pdf"),
            PendingFile::from_path("/tmp/plan.png"),
        ]);
        form.select_attachments(vec![PendingFile::from_path("/tmp/tarifs.pdf")]);
        assert_eq!(form.attachments, vec![PendingFile::from_path("/tmp/tarifs.pdf")]);
    }

    #[test]
    fn test_icon_selection_replaces_previous_icon() {
        let mut form = filled();
        form.select_icon(PendingFile::from_path("/tmp/a.png"));
        form.select_icon(PendingFile::from_path("/tmp/b.png"));
        assert_eq!(form.icon.unwrap().name, "b.png");
    }

    #[test]
    fn test_rename_attachment_keeps_content_path() {
        let mut form = filled();
        form.select_attachments(vec![PendingFile::from_path("/tmp/scan_0001.pdf")]);
        assert!(form.rename_attachment(0, "Horaires hiver.pdf"));
        assert!(!form.rename_attachment(3, "nope"));
        assert_eq!(form.attachments[0].name, "Horaires hiver.pdf");
        assert_eq!(form.attachments[0].path, PathBuf::from("/tmp/scan_0001.pdf"));
    }

    #[test]
    fn test_from_post_clears_file_fields() {
        let post = NewsPost {
            id: Some(3.into()),
            title: "Travaux".into(),
            date: None,
            scheduled: true,
            content: "Ligne C".into(),
            icon: Some("/uploads/icon.png".into()),
            attachments: vec![Attachment {
                name: "plan.pdf".into(),
                url: "/uploads/plan.pdf".into(),
            }],
        };
        let form = NewsForm::from_post(&post);
        assert_eq!(form.title, "Travaux");
        assert_eq!(form.date, "");
        assert!(form.scheduled);
        assert!(form.icon.is_none());
        assert!(form.attachments.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_local_attachment_uses_display_name_and_file_url() {
        let file = PendingFile::from_path("/tmp/scan 01.pdf").renamed("Plan.pdf");
        let attachment = file.to_local_attachment().unwrap();
        assert_eq!(attachment.name, "Plan.pdf");
        assert_eq!(attachment.url, "file:///tmp/scan%2001.pdf");
    }
}
