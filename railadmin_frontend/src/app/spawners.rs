use super::tasks;
use super::RailAdminApp;
use crate::news::NewsCommand;

impl RailAdminApp {
    pub(super) fn spawn_load_branding(&mut self) {
        tasks::load_branding(self.api.clone(), self.tx.clone());
    }

    /// Carries out what the news manager asked for.
    pub(super) fn run_news_command(&mut self, command: NewsCommand) {
        let (api, tx, generation) = (self.api.clone(), self.tx.clone(), self.news_generation);
        match command {
            NewsCommand::List => tasks::load_news(api, tx, generation),
            NewsCommand::Upload(batch) => tasks::upload_attachments(api, tx, generation, batch),
            NewsCommand::Save(post) => tasks::save_news(api, tx, generation, post),
            NewsCommand::Delete(id) => tasks::delete_news(api, tx, generation, id),
        }
    }

    pub(super) fn spawn_pick_icon(&mut self) {
        tasks::pick_icon(self.tx.clone());
    }

    pub(super) fn spawn_pick_attachments(&mut self) {
        tasks::pick_attachments(self.tx.clone());
    }

    pub(super) fn process_download_queue(&mut self) {
        // Start downloads up to the limit
        while let Some((key, source)) = self.images.next_download() {
            tasks::download_image(self.api.clone(), self.tx.clone(), key, source);
        }
    }
}
