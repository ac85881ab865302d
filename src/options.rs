//! The option record handed to yt-dlp, and the validation that produces it.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{DownloadError, Result};
use crate::format::{self, AUDIO_FORMAT_SELECTOR};
use crate::models::{AudioQuality, DownloadRequest, MediaKind, Quality};
use crate::progress::{OUTPUT_TEMPLATE, PROGRESS_TEMPLATE};
use crate::settings::Settings;

const MERGE_FORMAT: &str = "mp4";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    ExtractAudio { codec: String, quality: String },
}

impl PostProcessor {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            Self::ExtractAudio { codec, quality } => {
                args.push("--extract-audio".into());
                args.push("--audio-format".into());
                args.push(codec.clone());
                args.push("--audio-quality".into());
                // A bare number means a VBR level to yt-dlp; the suffix makes it a bitrate.
                if quality.chars().all(|c| c.is_ascii_digit()) {
                    args.push(format!("{quality}K"));
                } else {
                    args.push(quality.clone());
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadOptions {
    pub output_template: String,
    pub format: String,
    pub merge_output_format: Option<String>,
    pub postprocessors: Vec<PostProcessor>,
    pub retries: u32,
    pub check_certificate: bool,
    pub ignore_errors: bool,
    pub ffmpeg_location: Option<PathBuf>,
}

impl DownloadOptions {
    pub fn for_request(request: &DownloadRequest, settings: &Settings) -> Self {
        let output_template = request
            .destination
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .to_string();

        let (format, merge_output_format, postprocessors) = match request.kind {
            MediaKind::Video => (
                format::selector_for(request.quality).to_string(),
                Some(MERGE_FORMAT.to_string()),
                Vec::new(),
            ),
            MediaKind::Audio => (
                AUDIO_FORMAT_SELECTOR.to_string(),
                None,
                vec![PostProcessor::ExtractAudio {
                    codec: settings.audio_codec.clone(),
                    quality: request.audio_quality.bitrate().to_string(),
                }],
            ),
        };

        Self {
            output_template,
            format,
            merge_output_format,
            postprocessors,
            retries: settings.retries,
            check_certificate: settings.check_certificate,
            ignore_errors: settings.ignore_errors,
            ffmpeg_location: None,
        }
    }

    pub fn with_ffmpeg(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    /// Command-line form of the options, URL last.
    pub fn to_args(&self, url: &Url) -> Vec<String> {
        let mut args = vec![
            "--newline".to_string(),
            "--progress".to_string(),
            "--progress-template".to_string(),
            PROGRESS_TEMPLATE.to_string(),
            "--print".to_string(),
            OUTPUT_TEMPLATE.to_string(),
            "-o".to_string(),
            self.output_template.clone(),
            "-f".to_string(),
            self.format.clone(),
            "--retries".to_string(),
            self.retries.to_string(),
        ];

        if let Some(merge) = &self.merge_output_format {
            args.push("--merge-output-format".into());
            args.push(merge.clone());
        }
        for pp in &self.postprocessors {
            pp.push_args(&mut args);
        }
        if !self.check_certificate {
            args.push("--no-check-certificate".into());
        }
        if self.ignore_errors {
            args.push("--ignore-errors".into());
        }
        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.to_string_lossy().to_string());
        }

        args.push(url.to_string());
        args
    }
}

pub fn validate_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DownloadError::MissingUrl);
    }
    let url = Url::parse(raw).map_err(|e| DownloadError::InvalidUrl(format!("{raw} ({e})")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DownloadError::InvalidUrl(format!(
            "{raw} (unsupported scheme {other})"
        ))),
    }
}

/// Blank input uses `fallback`. Missing directories are created.
pub fn resolve_destination(raw: &str, fallback: &Path) -> Result<PathBuf> {
    let raw = raw.trim();
    let dir = if raw.is_empty() {
        fallback.to_path_buf()
    } else {
        PathBuf::from(raw)
    };

    if dir.exists() {
        if !dir.is_dir() {
            return Err(DownloadError::NotADirectory(dir));
        }
    } else {
        fs::create_dir_all(&dir).map_err(|source| DownloadError::CreateDestination {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(dir)
}

pub fn build_request(
    url: &str,
    destination: &str,
    kind: MediaKind,
    quality: Quality,
    audio_quality: AudioQuality,
    settings: &Settings,
) -> Result<DownloadRequest> {
    let url = validate_url(url)?;
    let destination = resolve_destination(destination, &settings.fallback_download_dir())?;
    Ok(DownloadRequest {
        url,
        destination,
        kind,
        quality,
        audio_quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: MediaKind, quality: Quality) -> DownloadRequest {
        DownloadRequest {
            url: Url::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            destination: PathBuf::from("/downloads"),
            kind,
            quality,
            audio_quality: AudioQuality::default(),
        }
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn video_options_merge_to_mp4() {
        let req = request(MediaKind::Video, Quality::P720);
        let opts = DownloadOptions::for_request(&req, &Settings::default());
        assert_eq!(opts.format, format::video_format_selector("720p"));
        assert_eq!(opts.merge_output_format.as_deref(), Some("mp4"));
        assert!(opts.postprocessors.is_empty());
        assert!(opts.output_template.ends_with("%(title)s.%(ext)s"));
        assert!(opts.output_template.starts_with("/downloads"));
    }

    #[test]
    fn audio_options_extract_mp3() {
        let req = request(MediaKind::Audio, Quality::P1080);
        let opts = DownloadOptions::for_request(&req, &Settings::default());
        assert_eq!(opts.format, AUDIO_FORMAT_SELECTOR);
        assert_eq!(opts.merge_output_format, None);
        assert_eq!(
            opts.postprocessors,
            vec![PostProcessor::ExtractAudio {
                codec: "mp3".into(),
                quality: "192".into()
            }]
        );
    }

    #[test]
    fn args_carry_flags_and_end_with_url() {
        let req = request(MediaKind::Audio, Quality::Best);
        let args = DownloadOptions::for_request(&req, &Settings::default())
            .with_ffmpeg(Some(PathBuf::from("/opt/ffmpeg")))
            .to_args(&req.url);

        assert_eq!(args.last().map(String::as_str), Some(req.url.as_str()));
        assert_eq!(value_after(&args, "-f"), Some("bestaudio/best"));
        assert_eq!(value_after(&args, "--audio-format"), Some("mp3"));
        assert_eq!(value_after(&args, "--audio-quality"), Some("192K"));
        assert_eq!(value_after(&args, "--retries"), Some("5"));
        assert_eq!(value_after(&args, "--ffmpeg-location"), Some("/opt/ffmpeg"));
        assert_eq!(value_after(&args, "--progress-template"), Some(PROGRESS_TEMPLATE));
        assert!(args.contains(&"--no-check-certificate".to_string()));
        assert!(args.contains(&"--ignore-errors".to_string()));
        assert!(!args.contains(&"--merge-output-format".to_string()));
    }

    #[test]
    fn audio_bitrate_choice_reaches_the_command_line() {
        let expected = [
            (AudioQuality::Kbps128, "128K"),
            (AudioQuality::Kbps192, "192K"),
            (AudioQuality::Kbps320, "320K"),
        ];
        for (audio_quality, flag) in expected {
            let req = DownloadRequest {
                audio_quality,
                ..request(MediaKind::Audio, Quality::Best)
            };
            let args = DownloadOptions::for_request(&req, &Settings::default()).to_args(&req.url);
            assert_eq!(value_after(&args, "--audio-quality"), Some(flag));
        }
    }

    #[test]
    fn video_ignores_audio_bitrate() {
        let req = DownloadRequest {
            audio_quality: AudioQuality::Kbps320,
            ..request(MediaKind::Video, Quality::P360)
        };
        let args = DownloadOptions::for_request(&req, &Settings::default()).to_args(&req.url);
        assert!(!args.contains(&"--audio-quality".to_string()));
        assert!(!args.contains(&"--extract-audio".to_string()));
    }

    #[test]
    fn certificate_check_and_errors_follow_settings() {
        let settings = Settings {
            check_certificate: true,
            ignore_errors: false,
            ..Default::default()
        };
        let req = request(MediaKind::Video, Quality::Best);
        let args = DownloadOptions::for_request(&req, &settings).to_args(&req.url);
        assert!(!args.contains(&"--no-check-certificate".to_string()));
        assert!(!args.contains(&"--ignore-errors".to_string()));
        assert!(!args.contains(&"--ffmpeg-location".to_string()));
        assert_eq!(value_after(&args, "--merge-output-format"), Some("mp4"));
    }

    #[test]
    fn rejects_empty_and_non_http_urls() {
        assert!(matches!(validate_url("   "), Err(DownloadError::MissingUrl)));
        assert!(matches!(validate_url("not a url"), Err(DownloadError::InvalidUrl(_))));
        assert!(matches!(
            validate_url("ftp://example.com/video"),
            Err(DownloadError::InvalidUrl(_))
        ));
        assert!(validate_url(" https://youtu.be/abc ").is_ok());
    }

    #[test]
    fn blank_destination_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_destination("", dir.path()).unwrap(), dir.path());
    }

    #[test]
    fn missing_destination_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        let resolved = resolve_destination(target.to_str().unwrap(), dir.path()).unwrap();
        assert!(resolved.is_dir());
    }

    #[test]
    fn file_destination_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            resolve_destination(file.to_str().unwrap(), dir.path()),
            Err(DownloadError::NotADirectory(_))
        ));
    }

    #[test]
    fn build_request_validates_url_first() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            download_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let audio = AudioQuality::Kbps320;
        assert!(build_request("", "", MediaKind::Video, Quality::Best, audio, &settings).is_err());

        let req = build_request(
            "https://vimeo.com/1",
            "",
            MediaKind::Audio,
            Quality::P360,
            audio,
            &settings,
        )
        .unwrap();
        assert_eq!(req.destination, dir.path());
        assert_eq!(req.kind, MediaKind::Audio);
        assert_eq!(req.audio_quality, AudioQuality::Kbps320);
    }
}
