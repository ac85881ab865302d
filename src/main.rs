use log::info;
use tracing_subscriber::EnvFilter;

mod app;
mod download;
mod error;
mod format;
mod localizations;
mod models;
mod options;
mod progress;
mod settings;
mod theme;
mod tools;
mod ui;

use app::YtdlApp;
use settings::Settings;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings_path = Settings::default_path();
    let settings = Settings::load_or_default(settings_path.as_deref());
    info!(
        "Loaded settings (kind {}, quality {})",
        settings.kind.label(),
        settings.quality
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 520.0])
            .with_min_inner_size([420.0, 440.0])
            .with_title("YouTube Downloader"),
        ..Default::default()
    };

    let app = YtdlApp::new(settings, settings_path);

    eframe::run_native(
        "YouTube Downloader",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}
