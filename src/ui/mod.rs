use rfd::FileDialog;
use std::path::Path;

use crate::localizations::Localizations;
use crate::models::{AppState, AudioQuality, MediaKind, Quality};
use crate::theme::*;

pub fn render_url_input(
    ui: &mut egui::Ui,
    state: &mut AppState,
    localizer: &Localizations,
) -> egui::Response {
    ui.label(localizer.text("url-label"));

    egui::Frame::group(ui.style())
        .fill(INPUT_FRAME_BG)
        .stroke(egui::Stroke::new(1.0, egui::Color32::LIGHT_GRAY))
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.add_sized(
                [ui.available_width(), 32.0],
                egui::TextEdit::singleline(&mut state.url)
                    .hint_text(localizer.text("url-placeholder"))
                    .font(egui::FontId::proportional(16.0)),
            )
        })
        .inner
}

pub fn render_download_dir_selector(
    ui: &mut egui::Ui,
    state: &mut AppState,
    localizer: &Localizations,
) {
    ui.label(localizer.text("download-to"));
    ui.horizontal(|ui| {
        ui.add_sized(
            [ui.available_width() - 110.0, 32.0],
            egui::TextEdit::singleline(&mut state.download_dir)
                .hint_text(localizer.text("dir-placeholder"))
                .margin(egui::vec2(8.0, 8.0)),
        );

        let label = egui::RichText::new(localizer.text("browse-button")).size(14.0);
        let button = egui::Button::new(label)
            .min_size(egui::vec2(100.0, 32.0))
            .rounding(ROUNDING_FRAME);

        if ui.add(button).clicked() {
            let start = if state.download_dir.trim().is_empty() {
                Path::new(".")
            } else {
                Path::new(&state.download_dir)
            };
            if let Some(path) = FileDialog::new().set_directory(start).pick_folder() {
                state.download_dir = path.to_string_lossy().to_string();
            }
        }
    });
}

pub fn render_kind_selector(ui: &mut egui::Ui, state: &mut AppState, localizer: &Localizations) {
    ui.horizontal(|ui| {
        ui.label(localizer.text("download-type"));
        for kind in MediaKind::ALL {
            let label = match kind {
                MediaKind::Video => localizer.text("kind-video"),
                MediaKind::Audio => localizer.text("kind-audio"),
            };
            ui.radio_value(&mut state.kind, kind, label);
        }
    });
}

/// Heights for video, MP3 bitrates for audio. Each kind keeps its own choice.
pub fn render_quality_selector(
    ui: &mut egui::Ui,
    state: &mut AppState,
    localizer: &Localizations,
) {
    ui.horizontal(|ui| match state.kind {
        MediaKind::Video => {
            ui.label(localizer.text("video-quality"));
            egui::ComboBox::from_id_source("video-quality")
                .selected_text(state.quality.label())
                .show_ui(ui, |ui| {
                    for quality in Quality::ALL {
                        ui.selectable_value(&mut state.quality, quality, quality.label());
                    }
                });
        }
        MediaKind::Audio => {
            ui.label(localizer.text("audio-quality"));
            egui::ComboBox::from_id_source("audio-quality")
                .selected_text(state.audio_quality.label())
                .show_ui(ui, |ui| {
                    for quality in AudioQuality::ALL {
                        ui.selectable_value(&mut state.audio_quality, quality, quality.label());
                    }
                });
        }
    });
}

pub fn render_status(ui: &mut egui::Ui, state: &AppState, localizer: &Localizations) {
    egui::Frame::group(ui.style())
        .fill(STATUS_FRAME_BG)
        .rounding(8.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical(|ui| {
                ui.add_space(6.0);

                let status_text = if let Some(error) = &state.last_error {
                    egui::RichText::new(format!("{} {}", localizer.text("error-prefix"), error))
                        .color(TEXT_ERROR)
                } else if !state.is_downloading && state.output_path.is_some() {
                    egui::RichText::new(&state.status).color(TEXT_SUCCESS)
                } else {
                    egui::RichText::new(&state.status).color(STATUS_TEXT)
                };
                ui.label(status_text);

                if state.is_downloading {
                    ui.add_space(6.0);
                    let progress = state.progress / 100.0;
                    let text = if !state.download_speed.is_empty() {
                        format!("{} - {}", state.download_speed, state.eta)
                    } else if state.progress > 0.0 {
                        state.status.clone()
                    } else {
                        localizer.text("status-starting")
                    };
                    ui.add(egui::ProgressBar::new(progress).show_percentage().text(text));
                    let percent = state.progress as u32;
                    ui.label(format!("{} {}%", localizer.text("progress-label"), percent));
                }

                if let Some(path) = &state.output_path {
                    ui.add_space(6.0);
                    ui.label(format!("{} {}", localizer.text("saved-to"), path.display()));
                }

                ui.add_space(6.0);
            });
        });
}

/// Returns (download clicked, update clicked). Both are disabled while a run is active.
pub fn render_buttons(
    ui: &mut egui::Ui,
    state: &AppState,
    localizer: &Localizations,
) -> (bool, bool) {
    let mut download = false;
    let mut update = false;

    ui.horizontal(|ui| {
        let download_button = egui::Button::new(
            egui::RichText::new(localizer.text("download-button"))
                .size(BUTTON_FONT_SIZE)
                .color(BUTTON_MAIN_TEXT),
        )
        .min_size(MIN_SIZE_BUTTON)
        .fill(PRIMARY_BUTTON_BG)
        .rounding(ROUNDING_BUTTON);

        download = ui.add_enabled(!state.is_downloading, download_button).clicked();

        ui.add_space(20.0);

        let update_button = egui::Button::new(
            egui::RichText::new(localizer.text("update-button"))
                .size(BUTTON_FONT_SIZE)
                .color(BUTTON_SECONDARY_TEXT),
        )
        .min_size(MIN_SIZE_BUTTON)
        .fill(SECONDARY_BUTTON_BG)
        .rounding(ROUNDING_BUTTON);

        update = ui.add_enabled(!state.is_downloading, update_button).clicked();
    });

    (download, update)
}
