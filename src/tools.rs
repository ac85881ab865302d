//! Locating the external downloader and transcoder binaries.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{DownloadError, Result};
use crate::settings::Settings;

pub fn ytdlp_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

pub fn ffmpeg_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    }
}

/// A configured path wins, otherwise `PATH` is searched.
pub fn resolve_ytdlp(settings: &Settings) -> Result<PathBuf> {
    if let Some(path) = settings.ytdlp_path.as_ref().filter(|p| p.is_file()) {
        return Ok(path.clone());
    }
    which::which(ytdlp_name()).map_err(|_| DownloadError::DownloaderMissing)
}

/// Configured path, then `ffmpeg` next to the working directory, then `PATH`.
/// `None` leaves the lookup to yt-dlp.
pub fn resolve_ffmpeg(settings: &Settings, working_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = settings.ffmpeg_path.as_ref().filter(|p| p.exists()) {
        return Some(path.clone());
    }
    let local = working_dir.join(ffmpeg_name());
    if local.is_file() {
        debug!("Using bundled ffmpeg at {}", local.display());
        return Some(local);
    }
    which::which(ffmpeg_name()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn configured_ffmpeg_wins() {
        let dir = tempfile::tempdir().unwrap();
        let configured = dir.path().join("custom-ffmpeg");
        fs::write(&configured, b"").unwrap();
        fs::write(dir.path().join(ffmpeg_name()), b"").unwrap();

        let settings = Settings {
            ffmpeg_path: Some(configured.clone()),
            ..Default::default()
        };
        assert_eq!(resolve_ffmpeg(&settings, dir.path()), Some(configured));
    }

    #[test]
    fn ffmpeg_in_working_dir_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(ffmpeg_name());
        fs::write(&local, b"").unwrap();

        assert_eq!(resolve_ffmpeg(&Settings::default(), dir.path()), Some(local));
    }

    #[test]
    fn configured_ytdlp_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join(ytdlp_name());
        fs::write(&bin, b"").unwrap();

        let settings = Settings {
            ytdlp_path: Some(bin.clone()),
            ..Default::default()
        };
        assert_eq!(resolve_ytdlp(&settings).unwrap(), bin);
    }
}
