//! News ("actualités") management: the cached post list, the single form
//! record and the submission state machine. Nothing in here performs I/O;
//! operations return a [`NewsCommand`] for the caller to run and the results
//! come back through the `apply_*` methods.

use log::{error, info, warn};

use crate::config::AttachmentMode;
use crate::models::{Attachment, NewsId, NewsPost};

mod cache;
mod form;

pub use cache::PostCache;
pub use form::{NewsForm, PendingFile, RequiredField, ValidationError};

pub const DELETE_CONFIRMATION: &str = "Voulez-vous vraiment supprimer cette actualité ?";

/// Whether a submission creates a new post or updates `Editing`'s post.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormMode {
    #[default]
    New,
    Editing(NewsPost),
}

impl FormMode {
    pub fn id(&self) -> Option<&NewsId> {
        match self {
            FormMode::New => None,
            FormMode::Editing(post) => post.id.as_ref(),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Editing(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    Uploading { files: usize },
    Saving,
}

/// Work the caller has to carry out against the API.
#[derive(Debug, Clone, PartialEq)]
pub enum NewsCommand {
    List,
    Upload(UploadBatch),
    Save(NewsPost),
    Delete(NewsId),
}

/// First phase of a submission: files to upload before `draft` is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadBatch {
    pub draft: NewsPost,
    pub icon: Option<PendingFile>,
    pub attachments: Vec<PendingFile>,
}

impl UploadBatch {
    pub fn len(&self) -> usize {
        usize::from(self.icon.is_some()) + self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Durable references obtained for an [`UploadBatch`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedFiles {
    pub icon: Option<Attachment>,
    pub attachments: Vec<Attachment>,
}

pub struct NewsManager {
    cache: PostCache,
    form: NewsForm,
    mode: FormMode,
    stage: Option<SubmitStage>,
    pending_upload: Option<NewsPost>,
    pending_delete: Option<NewsId>,
    alert: Option<ValidationError>,
    loading: bool,
    attachment_mode: AttachmentMode,
}

impl NewsManager {
    pub fn new(attachment_mode: AttachmentMode) -> Self {
        Self {
            cache: PostCache::default(),
            form: NewsForm::default(),
            mode: FormMode::New,
            stage: None,
            pending_upload: None,
            pending_delete: None,
            alert: None,
            loading: false,
            attachment_mode,
        }
    }

    pub fn posts(&self) -> &[NewsPost] {
        self.cache.posts()
    }

    pub fn cache(&self) -> &PostCache {
        &self.cache
    }

    pub fn form(&self) -> &NewsForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewsForm {
        &mut self.form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn stage(&self) -> Option<SubmitStage> {
        self.stage
    }

    pub fn is_submitting(&self) -> bool {
        self.stage.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn attachment_mode(&self) -> AttachmentMode {
        self.attachment_mode
    }

    pub fn alert(&self) -> Option<&ValidationError> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn pending_delete(&self) -> Option<&NewsId> {
        self.pending_delete.as_ref()
    }

    pub fn begin_list(&mut self) -> Option<NewsCommand> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(NewsCommand::List)
    }

    pub fn apply_listed(&mut self, result: anyhow::Result<Vec<NewsPost>>) {
        self.loading = false;
        match result {
            Ok(posts) => {
                info!("loaded {} actualites", posts.len());
                self.cache.replace_all(posts);
            }
            Err(err) => error!("Error fetching actualites: {err:#}"),
        }
    }

    /// Loads `post` into the form. Refused while a submission is in flight,
    /// since its completion resets the form.
    pub fn begin_edit(&mut self, post: &NewsPost) -> bool {
        if self.is_submitting() {
            warn!("edit refused: a submission is in progress");
            return false;
        }
        self.form = NewsForm::from_post(post);
        self.mode = FormMode::Editing(post.clone());
        true
    }

    pub fn cancel(&mut self) {
        self.reset_form();
    }

    /// Validates the form and starts a submission. A validation failure is
    /// also kept as the blocking alert and no command is produced. `Ok(None)`
    /// means the picked files could not be referenced; the form is kept.
    pub fn submit(&mut self) -> Result<Option<NewsCommand>, ValidationError> {
        if self.is_submitting() {
            return Ok(None);
        }
        if let Err(err) = self.form.validate() {
            self.alert = Some(err.clone());
            return Err(err);
        }

        let draft = self.draft();
        match self.attachment_mode {
            AttachmentMode::Upload if self.form.has_pending_files() => {
                let batch = UploadBatch {
                    draft: draft.clone(),
                    icon: self.form.icon.clone(),
                    attachments: self.form.attachments.clone(),
                };
                self.stage = Some(SubmitStage::Uploading { files: batch.len() });
                self.pending_upload = Some(draft);
                Ok(Some(NewsCommand::Upload(batch)))
            }
            AttachmentMode::Upload => {
                self.stage = Some(SubmitStage::Saving);
                Ok(Some(NewsCommand::Save(draft)))
            }
            AttachmentMode::Local => match self.local_files() {
                Ok(files) => {
                    self.stage = Some(SubmitStage::Saving);
                    Ok(Some(NewsCommand::Save(with_files(draft, files))))
                }
                Err(err) => {
                    error!("Error resolving local attachments: {err:#}");
                    Ok(None)
                }
            },
        }
    }

    /// Second phase of an upload submission. Returns the save command when
    /// every file made it to the server.
    pub fn apply_uploaded(&mut self, result: anyhow::Result<ResolvedFiles>) -> Option<NewsCommand> {
        let Some(draft) = self.pending_upload.take() else {
            warn!("upload result arrived with no submission in progress");
            return None;
        };
        match result {
            Ok(files) => {
                self.stage = Some(SubmitStage::Saving);
                Some(NewsCommand::Save(with_files(draft, files)))
            }
            Err(err) => {
                error!("Error uploading attachments: {err:#}");
                self.stage = None;
                None
            }
        }
    }

    /// Merges the server's answer to a save. `id` is the identifier the
    /// submission was sent with; `None` means it was a create.
    pub fn apply_saved(&mut self, id: Option<NewsId>, result: anyhow::Result<NewsPost>) {
        let settles_form = self.stage == Some(SubmitStage::Saving);
        match (id, result) {
            (None, Ok(created)) => {
                info!("actualite created");
                self.cache.insert_created(created);
            }
            (Some(id), Ok(updated)) => {
                info!("actualite {id} updated");
                self.cache.apply_updated(&id, updated);
            }
            (_, Err(err)) => error!("Error saving actualite: {err:#}"),
        }
        if settles_form {
            self.reset_form();
        } else {
            warn!("save result arrived with no save in progress, form kept");
        }
    }

    pub fn request_delete(&mut self, id: NewsId) {
        self.pending_delete = Some(id);
    }

    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    /// The user answered yes to the confirmation prompt.
    pub fn confirm_delete(&mut self) -> Option<NewsCommand> {
        self.pending_delete.take().map(NewsCommand::Delete)
    }

    pub fn apply_deleted(&mut self, id: &NewsId, result: anyhow::Result<()>) {
        match result {
            Ok(()) => {
                info!("actualite {id} deleted");
                self.cache.remove(id);
            }
            Err(err) => error!("Error deleting actualite {id}: {err:#}"),
        }
    }

    fn draft(&self) -> NewsPost {
        NewsPost {
            id: self.mode.id().cloned(),
            title: self.form.title.clone(),
            date: (!self.form.date.is_empty()).then(|| self.form.date.clone()),
            scheduled: self.form.scheduled,
            content: self.form.content.clone(),
            icon: None,
            attachments: Vec::new(),
        }
    }

    fn local_files(&self) -> anyhow::Result<ResolvedFiles> {
        let icon = self
            .form
            .icon
            .as_ref()
            .map(PendingFile::to_local_attachment)
            .transpose()?;
        let attachments = self
            .form
            .attachments
            .iter()
            .map(PendingFile::to_local_attachment)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(ResolvedFiles { icon, attachments })
    }

    fn reset_form(&mut self) {
        self.form = NewsForm::default();
        self.mode = FormMode::New;
        self.stage = None;
        self.pending_upload = None;
    }
}

fn with_files(mut draft: NewsPost, files: ResolvedFiles) -> NewsPost {
    draft.icon = files.icon.map(|icon| icon.url);
    draft.attachments = files.attachments;
    draft
}
