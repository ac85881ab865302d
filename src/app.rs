use log::{info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::download::{self, EventSink, WorkerEvent};
use crate::localizations::Localizations;
use crate::models::AppState;
use crate::options::{build_request, DownloadOptions};
use crate::settings::Settings;
use crate::tools;
use crate::ui;

pub struct YtdlApp {
    pub state: AppState,
    settings: Settings,
    settings_path: Option<PathBuf>,
    localizer: Localizations,
    event_sender: Sender<WorkerEvent>,
    event_receiver: Receiver<WorkerEvent>,
}

impl YtdlApp {
    pub fn new(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        let localizer = Localizations::new(settings.language.as_deref());
        info!("UI language {}", localizer.current_language());

        let state = AppState {
            status: localizer.text("status-ready"),
            kind: settings.kind,
            quality: settings.quality,
            audio_quality: settings.audio_quality,
            download_dir: settings.fallback_download_dir().to_string_lossy().to_string(),
            ..Default::default()
        };

        Self {
            state,
            settings,
            settings_path,
            localizer,
            event_sender: tx,
            event_receiver: rx,
        }
    }

    fn sink(&self, ctx: &egui::Context) -> EventSink {
        let ctx = ctx.clone();
        EventSink::new(self.event_sender.clone(), move || ctx.request_repaint())
    }

    fn fail(&mut self, message: String) {
        warn!("{}", message);
        self.state.status.clear();
        self.state.last_error = Some(message);
    }

    pub fn start_download(&mut self, ctx: &egui::Context) {
        if self.state.is_downloading {
            return;
        }

        let request = match build_request(
            &self.state.url,
            &self.state.download_dir,
            self.state.kind,
            self.state.quality,
            self.state.audio_quality,
            &self.settings,
        ) {
            Ok(request) => request,
            Err(e) => return self.fail(e.to_string()),
        };
        let ytdlp = match tools::resolve_ytdlp(&self.settings) {
            Ok(path) => path,
            Err(e) => return self.fail(e.to_string()),
        };

        self.remember_choices(&request.destination);

        let working_dir = std::env::current_dir().unwrap_or_default();
        let options = DownloadOptions::for_request(&request, &self.settings)
            .with_ffmpeg(tools::resolve_ffmpeg(&self.settings, &working_dir));

        self.state.download_dir = request.destination.to_string_lossy().to_string();
        self.state.reset_for_run();
        self.state.status = self.localizer.text("status-starting");

        download::start_download(ytdlp, request, options, self.sink(ctx));
        ctx.request_repaint();
    }

    pub fn update_ytdlp(&mut self, ctx: &egui::Context) {
        if self.state.is_downloading {
            return;
        }
        let ytdlp = match tools::resolve_ytdlp(&self.settings) {
            Ok(path) => path,
            Err(e) => return self.fail(e.to_string()),
        };

        self.state.reset_for_run();
        self.state.status = self.localizer.text("status-updating");

        download::update_ytdlp(ytdlp, self.sink(ctx));
        ctx.request_repaint();
    }

    fn remember_choices(&mut self, destination: &std::path::Path) {
        self.settings.download_dir = Some(destination.to_path_buf());
        self.settings.kind = self.state.kind;
        self.settings.quality = self.state.quality;
        self.settings.audio_quality = self.state.audio_quality;

        if let Some(path) = &self.settings_path {
            match self.settings.save(path) {
                Ok(()) => info!("Saved settings to {}", path.display()),
                Err(e) => warn!("Could not save settings: {:#}", e),
            }
        }
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            apply_event(&mut self.state, event);
        }
    }

    pub fn update_ui(&mut self, ctx: &egui::Context) {
        self.process_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.localizer.text("app-title"));
            ui.add_space(16.0);

            let url_response = ui::render_url_input(ui, &mut self.state, &self.localizer);
            if url_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.start_download(ctx);
            }
            ui.add_space(10.0);

            ui::render_download_dir_selector(ui, &mut self.state, &self.localizer);
            ui.add_space(10.0);

            ui::render_kind_selector(ui, &mut self.state, &self.localizer);
            ui::render_quality_selector(ui, &mut self.state, &self.localizer);
            ui.add_space(16.0);

            ui::render_status(ui, &self.state, &self.localizer);
            ui.add_space(16.0);

            let (download, update) = ui::render_buttons(ui, &self.state, &self.localizer);
            if download {
                self.start_download(ctx);
            }
            if update {
                self.update_ytdlp(ctx);
            }
        });

        if self.state.is_downloading {
            // The worker repaints on every event; this covers long silent stretches.
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

pub fn apply_event(state: &mut AppState, event: WorkerEvent) {
    match event {
        WorkerEvent::Progress {
            percent,
            speed,
            eta,
            status,
        } => {
            state.progress = percent;
            state.download_speed = speed;
            state.eta = eta;
            state.status = status;
        }
        WorkerEvent::Processing => {
            state.progress = 100.0;
            state.download_speed.clear();
            state.eta.clear();
            state.status = "Processing...".to_string();
        }
        WorkerEvent::OutputFile(path) => state.output_path = Some(path),
        WorkerEvent::Completed(message) => {
            state.is_downloading = false;
            state.progress = 100.0;
            state.status = message;
        }
        WorkerEvent::Failed(message) => {
            state.is_downloading = false;
            state.status.clear();
            state.last_error = Some(message);
        }
    }
}

impl eframe::App for YtdlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AudioQuality, MediaKind, Quality};

    fn app() -> YtdlApp {
        let dir = std::env::temp_dir();
        let settings = Settings {
            download_dir: Some(dir),
            language: Some("en".to_string()),
            ..Default::default()
        };
        YtdlApp::new(settings, None)
    }

    #[test]
    fn starts_ready_with_saved_choices() {
        let app = app();
        assert_eq!(app.state.status, "Ready");
        assert!(!app.state.is_downloading);
        assert_eq!(app.state.download_dir, std::env::temp_dir().to_string_lossy());
    }

    #[test]
    fn empty_url_is_rejected_without_starting() {
        let mut app = app();
        let ctx = egui::Context::default();
        app.start_download(&ctx);
        assert!(!app.state.is_downloading);
        assert_eq!(app.state.last_error.as_deref(), Some("Please enter a video URL."));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let mut app = app();
        app.state.url = "file:///etc/passwd".into();
        app.start_download(&egui::Context::default());
        assert!(!app.state.is_downloading);
        assert!(app.state.last_error.as_deref().unwrap().starts_with("Invalid URL"));
    }

    #[test]
    fn busy_app_ignores_second_click() {
        let mut app = app();
        app.state.is_downloading = true;
        app.state.status = "Downloading... 10%".into();
        app.start_download(&egui::Context::default());
        assert_eq!(app.state.status, "Downloading... 10%");
        assert!(app.state.last_error.is_none());
    }

    #[test]
    fn progress_then_completion() {
        let mut state = AppState {
            is_downloading: true,
            ..Default::default()
        };
        apply_event(
            &mut state,
            WorkerEvent::Progress {
                percent: 42.0,
                speed: "100.0 KB/s".into(),
                eta: "5s".into(),
                status: "Downloading... 42% | 100.0 KB/s | ETA: 5s".into(),
            },
        );
        assert_eq!(state.progress, 42.0);
        assert_eq!(state.eta, "5s");
        assert!(state.is_downloading);

        apply_event(&mut state, WorkerEvent::OutputFile(PathBuf::from("/d/x.mp4")));
        apply_event(&mut state, WorkerEvent::Completed("Downloaded: x.mp4".into()));
        assert!(!state.is_downloading);
        assert_eq!(state.progress, 100.0);
        assert_eq!(state.status, "Downloaded: x.mp4");
        assert_eq!(state.output_path, Some(PathBuf::from("/d/x.mp4")));
    }

    #[test]
    fn processing_fills_the_bar() {
        let mut state = AppState {
            is_downloading: true,
            progress: 63.0,
            download_speed: "80.0 KB/s".into(),
            ..Default::default()
        };
        apply_event(&mut state, WorkerEvent::Processing);
        assert_eq!(state.progress, 100.0);
        assert_eq!(state.status, "Processing...");
        assert!(state.download_speed.is_empty());
        assert!(state.is_downloading);
    }

    #[test]
    fn starting_a_download_saves_choices() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("config").join("settings.json");
        let destination = dir.path().join("music");
        let mut app = YtdlApp::new(
            Settings {
                language: Some("en".to_string()),
                ..Default::default()
            },
            Some(settings_path.clone()),
        );
        app.state.kind = MediaKind::Audio;
        app.state.quality = Quality::P360;
        app.state.audio_quality = AudioQuality::Kbps320;

        app.remember_choices(&destination);

        let saved = Settings::load(&settings_path).unwrap();
        assert_eq!(saved.download_dir, Some(destination));
        assert_eq!(saved.kind, MediaKind::Audio);
        assert_eq!(saved.quality, Quality::P360);
        assert_eq!(saved.audio_quality, AudioQuality::Kbps320);
        assert_eq!(saved.language.as_deref(), Some("en"));
    }

    #[test]
    fn saved_audio_quality_preselects_the_combo() {
        let app = YtdlApp::new(
            Settings {
                audio_quality: AudioQuality::Kbps128,
                ..Default::default()
            },
            None,
        );
        assert_eq!(app.state.audio_quality, AudioQuality::Kbps128);
    }

    #[test]
    fn failure_reenables_the_trigger() {
        let mut state = AppState {
            is_downloading: true,
            ..Default::default()
        };
        apply_event(&mut state, WorkerEvent::Failed("ERROR: Video unavailable".into()));
        assert!(!state.is_downloading);
        assert_eq!(state.last_error.as_deref(), Some("ERROR: Video unavailable"));
    }

    #[test]
    fn worker_events_reach_the_state() {
        let mut app = app();
        app.state.is_downloading = true;
        let sink = app.sink(&egui::Context::default());
        sink.send(WorkerEvent::Processing);
        sink.send(WorkerEvent::Completed("Download completed!".into()));

        app.process_events();
        assert!(!app.state.is_downloading);
        assert_eq!(app.state.status, "Download completed!");
    }
}
