use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use eframe::egui::{self, TextureHandle};

use crate::news::{NewsCommand, NewsManager};

// Maximum number of concurrent image downloads to prevent overwhelming the backend
pub const MAX_CONCURRENT_DOWNLOADS: usize = 4;

pub enum ViewState {
    Login,
    News(Box<NewsManager>),
    /// Any other admin route; those screens live outside this console.
    Placeholder(String),
    Settings,
}

/// What a view asks the app to do once rendering is over.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Navigate(String),
    OpenSettings,
    ApplyBaseUrl,
    Logout,
    Run(NewsCommand),
    PickIcon,
    PickAttachments,
}

pub struct LoadedImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Local(PathBuf),
}

impl ImageSource {
    pub fn key(&self) -> String {
        match self {
            ImageSource::Remote(url) => url.clone(),
            ImageSource::Local(path) => format!("local:{}", path.display()),
        }
    }
}

pub enum ImageSlot<'a> {
    Ready(TextureHandle),
    Loading,
    Failed(&'a str),
}

/// Decoded textures plus the bounded download queue feeding them.
#[derive(Default)]
pub struct ImageStore {
    textures: HashMap<String, TextureHandle>,
    loading: HashSet<String>,
    pending: HashMap<String, LoadedImage>,
    errors: HashMap<String, String>,
    queue: VecDeque<(String, ImageSource)>,
    active_downloads: usize,
}

impl ImageStore {
    /// Queues `source` unless it is already known under its key.
    pub fn request(&mut self, source: &ImageSource) -> bool {
        let key = source.key();
        if self.textures.contains_key(&key)
            || self.pending.contains_key(&key)
            || self.errors.contains_key(&key)
            || self.loading.contains(&key)
        {
            return false;
        }
        self.loading.insert(key.clone());
        self.queue.push_back((key, source.clone()));
        true
    }

    /// Next download to start, if the concurrency limit allows one.
    pub fn next_download(&mut self) -> Option<(String, ImageSource)> {
        if self.active_downloads >= MAX_CONCURRENT_DOWNLOADS {
            return None;
        }
        let next = self.queue.pop_front()?;
        self.active_downloads += 1;
        Some(next)
    }

    pub fn finish(&mut self, key: String, result: Result<LoadedImage, String>) {
        self.loading.remove(&key);
        self.active_downloads = self.active_downloads.saturating_sub(1);
        match result {
            Ok(image) => {
                self.pending.insert(key, image);
            }
            Err(err) => {
                log::error!("Failed to load image {key}: {err}");
                self.errors.insert(key, err);
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        !self.loading.is_empty()
    }

    /// Texture for `source`, uploading freshly decoded pixels on first use
    /// and queueing the download when nothing is known yet.
    pub fn slot(&mut self, ctx: &egui::Context, source: &ImageSource) -> ImageSlot<'_> {
        let key = source.key();
        if let Some(image) = self.pending.remove(&key) {
            let color = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.pixels);
            let texture = ctx.load_texture(&key, color, egui::TextureOptions::default());
            self.textures.insert(key.clone(), texture);
        }
        if let Some(texture) = self.textures.get(&key) {
            return ImageSlot::Ready(texture.clone());
        }
        if self.errors.contains_key(&key) {
            let err = self.errors.get(&key).map(String::as_str).unwrap_or_default();
            return ImageSlot::Failed(err);
        }
        self.request(source);
        ImageSlot::Loading
    }
}
