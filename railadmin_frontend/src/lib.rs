pub mod api;
pub mod app;
pub mod auth;
pub mod color_theme;
pub mod config;
pub mod models;
pub mod news;
pub mod shell;
pub mod theme;

use eframe::{self, egui};

pub use app::RailAdminApp;
pub use config::AdminConfig;

/// Launches the console with default window options and the environment's configuration.
pub fn run_frontend() -> Result<(), eframe::Error> {
    let _ = env_logger::builder().is_test(false).try_init();
    run_frontend_with_options(AdminConfig::from_env(), default_native_options())
}

/// Launches the console with caller-provided configuration and options.
pub fn run_frontend_with_options(
    config: AdminConfig,
    options: eframe::NativeOptions,
) -> Result<(), eframe::Error> {
    let _ = env_logger::builder().is_test(false).try_init();
    eframe::run_native(
        "Administration Ferroviaire",
        options,
        Box::new(move |cc| Ok(Box::new(RailAdminApp::new(cc, config)?))),
    )
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    }
}
