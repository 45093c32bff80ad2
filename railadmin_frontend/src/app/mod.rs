use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use anyhow::Result;
use eframe::egui::{self, Context};
use log::{error, info, warn};

use crate::api::ApiClient;
use crate::auth::{guard_admin, Access, Session};
use crate::config::AdminConfig;
use crate::news::NewsManager;
use crate::shell::{NavigationShell, LOGIN_ROUTE, NEWS_ROUTE};

mod messages;
mod spawners;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{ImageStore, UiAction, ViewState};

const BASE_URL_KEY: &str = "railadmin.api_url";
// Worker results are polled from the channel; this keeps frames coming while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct RailAdminApp {
    api: ApiClient,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    config: AdminConfig,
    session: Session,
    shell: Option<NavigationShell>,
    view: ViewState,
    images: ImageStore,
    base_url_input: String,
    info_banner: Option<String>,
    restore_style: bool,
    // Bumped for every news view built; worker results carry the value they were spawned under.
    news_generation: u64,
}

impl RailAdminApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AdminConfig) -> Result<Self> {
        let stored_url = cc
            .storage
            .and_then(|storage| eframe::get_value::<String>(storage, BASE_URL_KEY));
        Self::with_config(config, stored_url)
    }

    /// Builds the app and opens the configured start route. A stored base
    /// URL from a previous session wins over the configured one.
    pub fn with_config(config: AdminConfig, stored_url: Option<String>) -> Result<Self> {
        let api = match stored_url {
            Some(url) => ApiClient::with_timeout(url, config.http_timeout).or_else(|err| {
                warn!("stored API URL rejected ({err:#}), using {}", config.api_url);
                ApiClient::with_timeout(config.api_url.clone(), config.http_timeout)
            })?,
            None => ApiClient::with_timeout(config.api_url.clone(), config.http_timeout)?,
        };
        info!("using API at {}", api.base_url());
        let (tx, rx) = mpsc::channel();

        let mut app = Self {
            base_url_input: api.base_url().to_string(),
            api,
            tx,
            rx,
            session: config.session.clone(),
            shell: None,
            view: ViewState::Login,
            images: ImageStore::default(),
            info_banner: None,
            restore_style: false,
            news_generation: 0,
            config,
        };
        let start = app.config.start_route.clone();
        app.navigate(&start);
        Ok(app)
    }

    /// Opens `path`. Admin routes pass the guard before their view is built;
    /// a refused session lands on the login route.
    pub(crate) fn navigate(&mut self, path: &str) {
        if path == LOGIN_ROUTE {
            self.show_login();
            return;
        }
        if guard_admin(&self.session) == Access::RedirectToLogin {
            warn!("access to {path} refused, redirecting to {LOGIN_ROUTE}");
            self.show_login();
            return;
        }

        let shell = self.shell.get_or_insert_with(|| {
            info!("navigation shell mounted on {path}");
            NavigationShell::mount(path)
        });
        shell.set_current_path(path);
        if shell.take_branding_request() {
            self.spawn_load_branding();
        }

        if path == NEWS_ROUTE {
            // An already mounted news view is only refreshed.
            let list = match &mut self.view {
                ViewState::News(manager) => manager.begin_list(),
                _ => {
                    self.news_generation += 1;
                    let mut manager = NewsManager::new(self.config.attachment_mode);
                    let list = manager.begin_list();
                    self.view = ViewState::News(Box::new(manager));
                    list
                }
            };
            if let Some(command) = list {
                self.run_news_command(command);
            }
        } else {
            self.view = ViewState::Placeholder(path.to_string());
        }
    }

    /// Sign-out: closes the session, then the login route takes over.
    pub(crate) fn logout(&mut self) {
        self.session.logout();
        self.navigate(LOGIN_ROUTE);
    }

    pub(crate) fn apply_base_url(&mut self) {
        match self.api.set_base_url(self.base_url_input.clone()) {
            Ok(()) => {
                self.base_url_input = self.api.base_url().to_string();
                self.info_banner = Some("URL de l'API mise à jour".into());
                let current = self
                    .shell
                    .as_ref()
                    .map(|shell| shell.current_path().to_string())
                    .unwrap_or_else(|| self.config.start_route.clone());
                self.navigate(&current);
            }
            Err(err) => {
                error!("failed to update API URL: {err:#}");
                self.info_banner = Some(format!("URL invalide : {err}"));
            }
        }
    }

    fn show_login(&mut self) {
        self.unmount_shell();
        self.view = ViewState::Login;
    }

    fn unmount_shell(&mut self) {
        if let Some(shell) = self.shell.take() {
            shell.unmount();
            self.restore_style = true;
        }
    }

    fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::Navigate(path) => self.navigate(&path),
            UiAction::OpenSettings => {
                self.base_url_input = self.api.base_url().to_string();
                self.view = ViewState::Settings;
            }
            UiAction::ApplyBaseUrl => self.apply_base_url(),
            UiAction::Logout => self.logout(),
            UiAction::Run(command) => self.run_news_command(command),
            UiAction::PickIcon => self.spawn_pick_icon(),
            UiAction::PickAttachments => self.spawn_pick_attachments(),
        }
    }
}

impl eframe::App for RailAdminApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();
        self.process_download_queue();

        if std::mem::take(&mut self.restore_style) {
            ctx.set_style(egui::Style::default());
        }
        if let Some(shell) = self.shell.as_mut() {
            shell.theme_mut().apply(ctx);
        }

        let mut actions = Vec::new();

        if let Some(mut shell) = self.shell.take() {
            egui::SidePanel::left("sidebar")
                .resizable(false)
                .exact_width(250.0)
                .show(ctx, |ui| {
                    actions.extend(self.render_sidebar(ui, &mut shell));
                });
            self.shell = Some(shell);
        }

        // The view is taken out while it renders; views only return actions.
        let mut view = std::mem::replace(&mut self.view, ViewState::Login);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_info_banner(ui);
            let action = match &mut view {
                ViewState::Login => self.render_login(ui),
                ViewState::News(manager) => self.render_news(ui, manager),
                ViewState::Placeholder(path) => self.render_placeholder(ui, path),
                ViewState::Settings => self.render_settings(ui),
            };
            actions.extend(action);
        });
        if let ViewState::News(manager) = &mut view {
            actions.extend(self.render_news_dialogs(ctx, manager));
        }
        self.view = view;

        for action in actions {
            self.handle_action(action);
        }

        let interval = if self.images.is_busy() {
            Duration::from_millis(50)
        } else {
            POLL_INTERVAL
        };
        ctx.request_repaint_after(interval);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, BASE_URL_KEY, &self.api.base_url().to_string());
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.unmount_shell();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttachmentMode;
    use crate::shell::{find_link, DASHBOARD_ROUTE};

    // Nothing listens there; background requests fail fast and are ignored.
    fn config(session: Session) -> AdminConfig {
        AdminConfig {
            api_url: "http://127.0.0.1:9".into(),
            http_timeout: Duration::from_millis(200),
            attachment_mode: AttachmentMode::Upload,
            start_route: NEWS_ROUTE.into(),
            session,
        }
    }

    #[test]
    fn test_admin_lands_on_news_with_shell() {
        let app = RailAdminApp::with_config(config(Session::admin()), None).unwrap();
        assert!(matches!(app.view, ViewState::News(_)));
        let shell = app.shell.as_ref().unwrap();
        assert_eq!(shell.current_path(), NEWS_ROUTE);
    }

    #[test]
    fn test_guard_refuses_before_building_view() {
        for session in [Session::anonymous(), Session::new(true, Some("agent".into()))] {
            let app = RailAdminApp::with_config(config(session), None).unwrap();
            assert!(matches!(app.view, ViewState::Login));
            assert!(app.shell.is_none());
        }
    }

    #[test]
    fn test_logout_unmounts_shell_and_shows_login() {
        let mut app = RailAdminApp::with_config(config(Session::admin()), None).unwrap();
        app.handle_action(UiAction::Logout);
        assert!(matches!(app.view, ViewState::Login));
        assert!(app.shell.is_none());
        assert!(app.restore_style);
        assert!(!app.session.is_authenticated());

        app.navigate(NEWS_ROUTE);
        assert!(matches!(app.view, ViewState::Login));
    }

    #[test]
    fn test_navigation_keeps_shell_and_updates_active_route() {
        let mut app = RailAdminApp::with_config(config(Session::admin()), None).unwrap();
        app.handle_action(UiAction::Navigate("/admin/stations".into()));
        assert!(matches!(&app.view, ViewState::Placeholder(path) if path == "/admin/stations"));
        assert_eq!(app.shell.as_ref().unwrap().current_path(), "/admin/stations");

        app.handle_action(UiAction::Navigate(NEWS_ROUTE.into()));
        assert!(matches!(app.view, ViewState::News(_)));
    }

    fn news(app: &mut RailAdminApp) -> &mut NewsManager {
        match &mut app.view {
            ViewState::News(manager) => manager.as_mut(),
            _ => panic!("news view not mounted"),
        }
    }

    #[test]
    fn test_reopening_mounted_news_route_keeps_manager() {
        let mut app = RailAdminApp::with_config(config(Session::admin()), None).unwrap();
        let generation = app.news_generation;
        news(&mut app).form_mut().title = "brouillon".into();

        app.handle_action(UiAction::Navigate(NEWS_ROUTE.into()));
        assert_eq!(app.news_generation, generation);
        assert_eq!(news(&mut app).form().title, "brouillon");
    }

    #[test]
    fn test_results_from_a_previous_news_view_are_dropped() {
        let mut app = RailAdminApp::with_config(config(Session::admin()), None).unwrap();
        let stale = app.news_generation;
        app.navigate("/admin/stations");
        app.navigate(NEWS_ROUTE);
        assert_eq!(app.news_generation, stale + 1);

        let current = app.news_generation;
        let manager = news(&mut app);
        manager.apply_listed(Ok(Vec::new()));
        manager.form_mut().title = "saisie".into();
        manager.form_mut().content = "texte".into();
        let Some(crate::news::NewsCommand::Save(draft)) = manager.submit().unwrap() else {
            panic!("expected a save command");
        };

        let mut old = draft.clone();
        old.id = Some(7.into());
        app.tx
            .send(AppMessage::NewsSaved { generation: stale, id: None, result: Ok(old) })
            .unwrap();
        app.process_messages();
        assert!(news(&mut app).is_submitting());
        assert!(news(&mut app).posts().is_empty());

        let mut created = draft;
        created.id = Some(8.into());
        app.tx
            .send(AppMessage::NewsSaved { generation: current, id: None, result: Ok(created) })
            .unwrap();
        app.process_messages();
        let manager = news(&mut app);
        assert!(!manager.is_submitting());
        assert_eq!(manager.posts().len(), 1);
    }

    #[test]
    fn test_brand_header_action_opens_dashboard() {
        let mut app = RailAdminApp::with_config(config(Session::admin()), None).unwrap();
        app.handle_action(UiAction::Navigate(DASHBOARD_ROUTE.into()));
        assert!(matches!(&app.view, ViewState::Placeholder(path) if path == DASHBOARD_ROUTE));
        let shell = app.shell.as_ref().unwrap();
        assert!(shell.is_active(&find_link(DASHBOARD_ROUTE).unwrap()));
        assert!(!shell.is_active(&find_link(NEWS_ROUTE).unwrap()));
    }

    #[test]
    fn test_stored_url_wins_and_bad_one_falls_back() {
        let app = RailAdminApp::with_config(
            config(Session::admin()),
            Some("http://10.0.0.5:3000/".into()),
        )
        .unwrap();
        assert_eq!(app.api.base_url(), "http://10.0.0.5:3000");

        let app =
            RailAdminApp::with_config(config(Session::admin()), Some("http://[::1".into())).unwrap();
        assert_eq!(app.api.base_url(), "http://127.0.0.1:9");
    }
}
