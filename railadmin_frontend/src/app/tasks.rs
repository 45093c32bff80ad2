use std::sync::mpsc::Sender;
use std::thread;

use log::{error, info};

use crate::api::ApiClient;
use crate::models::{NewsId, NewsPost};
use crate::news::UploadBatch;

use super::messages::AppMessage;
use super::state::{ImageSource, LoadedImage};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

pub fn load_branding(client: ApiClient, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        let result = client.fetch_branding();
        if tx.send(AppMessage::BrandingLoaded(result)).is_err() {
            error!("failed to send BrandingLoaded message");
        }
    });
}

pub fn load_news(client: ApiClient, tx: Sender<AppMessage>, generation: u64) {
    thread::spawn(move || {
        let result = client.list_news();
        if tx.send(AppMessage::NewsLoaded { generation, result }).is_err() {
            error!("failed to send NewsLoaded message");
        }
    });
}

pub fn upload_attachments(
    client: ApiClient,
    tx: Sender<AppMessage>,
    generation: u64,
    batch: UploadBatch,
) {
    thread::spawn(move || {
        info!("uploading {} file(s)", batch.len());
        let result = client.upload_batch(&batch);
        if tx.send(AppMessage::AttachmentsUploaded { generation, result }).is_err() {
            error!("failed to send AttachmentsUploaded message");
        }
    });
}

pub fn save_news(client: ApiClient, tx: Sender<AppMessage>, generation: u64, post: NewsPost) {
    thread::spawn(move || {
        let id = post.id.clone();
        let result = client.save_news(&post);
        if tx.send(AppMessage::NewsSaved { generation, id, result }).is_err() {
            error!("failed to send NewsSaved message");
        }
    });
}

pub fn delete_news(client: ApiClient, tx: Sender<AppMessage>, generation: u64, id: NewsId) {
    thread::spawn(move || {
        let result = client.delete_news(&id);
        if tx.send(AppMessage::NewsDeleted { generation, id, result }).is_err() {
            error!("failed to send NewsDeleted message");
        }
    });
}

pub fn download_image(client: ApiClient, tx: Sender<AppMessage>, key: String, source: ImageSource) {
    thread::spawn(move || {
        let bytes = match &source {
            ImageSource::Remote(url) => {
                log::debug!("Downloading image from URL: {url}");
                client.fetch_bytes(url).map_err(|e| format!("Download error: {e:#}"))
            }
            ImageSource::Local(path) => {
                std::fs::read(path).map_err(|e| format!("Read error: {e}"))
            }
        };
        let result = bytes.and_then(|bytes| decode_image(&bytes));
        if tx.send(AppMessage::ImageLoaded { key, result }).is_err() {
            error!("failed to send ImageLoaded message");
        }
    });
}

pub fn pick_icon(tx: Sender<AppMessage>) {
    thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            if tx.send(AppMessage::IconSelected(path)).is_err() {
                error!("failed to send IconSelected message");
            }
        }
    });
}

pub fn pick_attachments(tx: Sender<AppMessage>) {
    thread::spawn(move || {
        if let Some(files) = rfd::FileDialog::new().pick_files() {
            if tx.send(AppMessage::AttachmentsSelected(files)).is_err() {
                error!("failed to send AttachmentsSelected message");
            }
        }
    });
}

fn decode_image(bytes: &[u8]) -> Result<LoadedImage, String> {
    let dyn_img = image::load_from_memory(bytes).map_err(|e| format!("Image decode error: {e}"))?;
    let rgba = dyn_img.to_rgba8();
    let size = [dyn_img.width() as usize, dyn_img.height() as usize];
    Ok(LoadedImage {
        size,
        pixels: rgba.as_flat_samples().as_slice().to_vec(),
    })
}
