use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::{AudioQuality, MediaKind, Quality};

const APP_DIR: &str = "ytdown";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub download_dir: Option<PathBuf>,
    pub kind: MediaKind,
    pub quality: Quality,
    pub ytdlp_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub retries: u32,
    pub check_certificate: bool,
    pub ignore_errors: bool,
    pub audio_codec: String,
    pub audio_quality: AudioQuality,
    pub language: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_dir: None,
            kind: MediaKind::Video,
            quality: Quality::Best,
            ytdlp_path: None,
            ffmpeg_path: None,
            retries: 5,
            check_certificate: false,
            ignore_errors: true,
            audio_codec: "mp3".to_string(),
            audio_quality: AudioQuality::Kbps192,
            language: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Missing or unreadable files yield defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
    }

    /// Used when the destination field is left blank.
    pub fn fallback_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    }
}
