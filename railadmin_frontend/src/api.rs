use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::Url;

use crate::models::{Attachment, BrandingSettings, EntrepriseResponse, NewsId, NewsPost};
use crate::news::{PendingFile, ResolvedFiles, UploadBatch};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const NEWS_PATH: &str = "/api/actualites";
const SETTINGS_PATH: &str = "/api/entreprise";
const UPLOADS_PATH: &str = "/api/uploads";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    /// Reads the operator branding. `Ok(None)` means the server answered
    /// without a settings object, in which case the caller keeps its defaults.
    pub fn fetch_branding(&self) -> Result<Option<BrandingSettings>> {
        let url = self.url(SETTINGS_PATH)?;
        let response = self.client.get(url).send()?.error_for_status()?;
        let envelope: EntrepriseResponse = response.json()?;
        Ok(envelope.entreprise_settings.map(BrandingSettings::from))
    }

    pub fn list_news(&self) -> Result<Vec<NewsPost>> {
        let url = self.url(NEWS_PATH)?;
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    pub fn create_news(&self, post: &NewsPost) -> Result<NewsPost> {
        let url = self.url(NEWS_PATH)?;
        let response = self
            .client
            .post(url)
            .json(post)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    pub fn update_news(&self, id: &NewsId, post: &NewsPost) -> Result<NewsPost> {
        let url = self.news_url(id)?;
        let response = self
            .client
            .put(url)
            .json(post)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Creates the post when it carries no id, updates it otherwise.
    pub fn save_news(&self, post: &NewsPost) -> Result<NewsPost> {
        match &post.id {
            Some(id) => self
                .update_news(id, post)
                .with_context(|| format!("failed to update actualite {id}")),
            None => self
                .create_news(post)
                .context("failed to create actualite"),
        }
    }

    pub fn delete_news(&self, id: &NewsId) -> Result<()> {
        let url = self.news_url(id)?;
        self.client.delete(url).send()?.error_for_status()?;
        Ok(())
    }

    /// Uploads a picked file under its display name and returns the durable
    /// reference handed back by the server.
    pub fn upload_file(&self, file: &PendingFile) -> Result<Attachment> {
        let url = self.url(UPLOADS_PATH)?;
        let part = Part::file(&file.path)
            .with_context(|| format!("failed to read {}", file.path.display()))?
            .file_name(file.name.clone());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()?
            .error_for_status()?;
        let mut attachment: Attachment = response.json()?;
        attachment.url = self.resolve_url(&attachment.url);
        Ok(attachment)
    }

    /// Uploads the icon, then every attachment, in order. The first failure
    /// aborts the batch.
    pub fn upload_batch(&self, batch: &UploadBatch) -> Result<ResolvedFiles> {
        let icon = batch
            .icon
            .as_ref()
            .map(|file| {
                self.upload_file(file)
                    .with_context(|| format!("failed to upload icon {}", file.name))
            })
            .transpose()?;
        let attachments = batch
            .attachments
            .iter()
            .map(|file| {
                self.upload_file(file)
                    .with_context(|| format!("failed to upload attachment {}", file.name))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedFiles { icon, attachments })
    }

    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.resolve_url(url))
            .send()?
            .error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    /// Turns a server-relative reference such as `/images/logo.png` into an
    /// absolute URL; absolute URLs are returned untouched.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.contains("://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    fn news_url(&self, id: &NewsId) -> Result<Url> {
        let mut url = self.url(NEWS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("base URL cannot carry a path"))?
            .push(&id.to_string());
        Ok(url)
    }

    fn url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).context("invalid base URL")?;
        url.set_path(path.trim_start_matches('/'));
        Ok(url)
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_adds_scheme_and_strips_slashes() {
        assert_eq!(
            sanitize_base_url("localhost:3000//".into()).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            sanitize_base_url(" https://admin.example.org/ ".into()).unwrap(),
            "https://admin.example.org"
        );
    }

    #[test]
    fn test_resolve_url() {
        let api = ApiClient::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            api.resolve_url("/images/sncf-logo.png"),
            "http://127.0.0.1:3000/images/sncf-logo.png"
        );
        assert_eq!(api.resolve_url("uploads/a.pdf"), "http://127.0.0.1:3000/uploads/a.pdf");
        assert_eq!(
            api.resolve_url("https://cdn.example.org/a.png"),
            "https://cdn.example.org/a.png"
        );
    }

    #[test]
    fn test_news_url_escapes_text_ids() {
        let api = ApiClient::new("http://127.0.0.1:3000").unwrap();
        let url = api.news_url(&NewsId::Text("a b".into())).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/actualites/a%20b");
        let url = api.news_url(&NewsId::Number(7)).unwrap();
        assert_eq!(url.path(), "/api/actualites/7");
    }
}
