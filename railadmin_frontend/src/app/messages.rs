use std::path::PathBuf;

use log::{debug, warn};

use crate::models::{BrandingSettings, NewsId, NewsPost};
use crate::news::{NewsManager, PendingFile, ResolvedFiles};

use super::state::{LoadedImage, ViewState};
use super::RailAdminApp;

pub enum AppMessage {
    BrandingLoaded(Result<Option<BrandingSettings>, anyhow::Error>),
    NewsLoaded {
        generation: u64,
        result: Result<Vec<NewsPost>, anyhow::Error>,
    },
    AttachmentsUploaded {
        generation: u64,
        result: Result<ResolvedFiles, anyhow::Error>,
    },
    NewsSaved {
        generation: u64,
        id: Option<NewsId>,
        result: Result<NewsPost, anyhow::Error>,
    },
    NewsDeleted {
        generation: u64,
        id: NewsId,
        result: Result<(), anyhow::Error>,
    },
    ImageLoaded {
        key: String,
        result: Result<LoadedImage, String>,
    },
    IconSelected(PathBuf),
    AttachmentsSelected(Vec<PathBuf>),
}

pub fn process_messages(app: &mut RailAdminApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::BrandingLoaded(result) => match app.shell.as_mut() {
                Some(shell) => {
                    shell.apply_branding(result);
                }
                None => debug!("branding arrived after the shell unmounted"),
            },
            AppMessage::NewsLoaded { generation, result } => {
                if let Some(manager) = news_view(app, generation) {
                    manager.apply_listed(result);
                }
            }
            AppMessage::AttachmentsUploaded { generation, result } => {
                let next = news_view(app, generation).and_then(|manager| manager.apply_uploaded(result));
                if let Some(command) = next {
                    app.run_news_command(command);
                }
            }
            AppMessage::NewsSaved { generation, id, result } => {
                if let Some(manager) = news_view(app, generation) {
                    manager.apply_saved(id, result);
                }
            }
            AppMessage::NewsDeleted { generation, id, result } => {
                if let Some(manager) = news_view(app, generation) {
                    manager.apply_deleted(&id, result);
                }
            }
            AppMessage::ImageLoaded { key, result } => {
                app.images.finish(key, result);
                // Download completed, process next item in queue
                app.process_download_queue();
            }
            AppMessage::IconSelected(path) => {
                if let Some(manager) = mounted_news(&mut app.view) {
                    manager.form_mut().select_icon(PendingFile::from_path(path));
                }
            }
            AppMessage::AttachmentsSelected(paths) => {
                if let Some(manager) = mounted_news(&mut app.view) {
                    let files = paths.into_iter().map(PendingFile::from_path).collect();
                    manager.form_mut().select_attachments(files);
                }
            }
        }
    }
}

/// The news manager a worker result belongs to. Results spawned under an
/// earlier news view are dropped, like the answers to an unmounted page.
fn news_view(app: &mut RailAdminApp, generation: u64) -> Option<&mut NewsManager> {
    if generation != app.news_generation {
        warn!(
            "news result dropped: spawned under view {generation}, view {} is mounted",
            app.news_generation
        );
        return None;
    }
    mounted_news(&mut app.view)
}

fn mounted_news(view: &mut ViewState) -> Option<&mut NewsManager> {
    match view {
        ViewState::News(manager) => Some(manager.as_mut()),
        _ => {
            warn!("news result dropped: the news view is not mounted");
            None
        }
    }
}
