use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaKind {
    #[default]
    Video,
    Audio,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Video, MediaKind::Audio];

    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
        }
    }
}

/// Quality choices offered for video downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Quality {
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[default]
    Best,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::P360, Quality::P720, Quality::P1080, Quality::Best];

    pub fn label(self) -> &'static str {
        match self {
            Self::P360 => "360p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::Best => "Best",
        }
    }

    /// Unrecognized labels fall back to `Best`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|q| q.label().eq_ignore_ascii_case(label))
            .unwrap_or(Self::Best)
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// MP3 bitrate choices offered for audio downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AudioQuality {
    #[serde(rename = "128kbps")]
    Kbps128,
    #[default]
    #[serde(rename = "192kbps")]
    Kbps192,
    #[serde(rename = "320kbps")]
    Kbps320,
}

impl AudioQuality {
    pub const ALL: [AudioQuality; 3] = [
        AudioQuality::Kbps128,
        AudioQuality::Kbps192,
        AudioQuality::Kbps320,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Kbps128 => "128kbps",
            Self::Kbps192 => "192kbps",
            Self::Kbps320 => "320kbps",
        }
    }

    /// Kilobits per second, as the extract-audio post-processor expects it.
    pub fn bitrate(self) -> &'static str {
        match self {
            Self::Kbps128 => "128",
            Self::Kbps192 => "192",
            Self::Kbps320 => "320",
        }
    }

    /// Accepts `192kbps`, `192k` or a bare `192`. Anything else is 192.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        let number = label
            .strip_suffix("kbps")
            .or_else(|| label.strip_suffix('k'))
            .unwrap_or(label.as_str())
            .trim();
        Self::ALL
            .into_iter()
            .find(|q| q.bitrate() == number)
            .unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for AudioQuality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One download, built when the user clicks Download and dropped when the worker finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: Url,
    pub destination: PathBuf,
    pub kind: MediaKind,
    pub quality: Quality,
    pub audio_quality: AudioQuality,
}

#[derive(Default)]
pub struct AppState {
    pub url: String,
    pub kind: MediaKind,
    pub quality: Quality,
    pub audio_quality: AudioQuality,
    pub is_downloading: bool,
    pub progress: f32,
    pub status: String,
    pub last_error: Option<String>,
    pub download_speed: String,
    pub eta: String,
    pub output_path: Option<PathBuf>,
    pub download_dir: String,
}

impl AppState {
    pub fn reset_for_run(&mut self) {
        self.is_downloading = true;
        self.progress = 0.0;
        self.last_error = None;
        self.download_speed.clear();
        self.eta.clear();
        self.output_path = None;
    }
}
