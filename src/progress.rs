//! Parsing of the machine-readable lines yt-dlp prints while it works.
//!
//! The downloader is started with [`PROGRESS_TEMPLATE`] and [`OUTPUT_TEMPLATE`],
//! so every progress tick and the final file path arrive as `|`-separated
//! records. Anything else is passed through as free text.

use std::path::PathBuf;

const PROGRESS_PREFIX: &str = "YTDOWN_PROGRESS|";
const OUTPUT_PREFIX: &str = "YTDOWN_FILE|";

pub const PROGRESS_TEMPLATE: &str = "download:YTDOWN_PROGRESS|%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress.speed)s|%(progress.eta)s";

pub const OUTPUT_TEMPLATE: &str = "after_move:YTDOWN_FILE|%(filepath)s";

/// Post-processor tags that yt-dlp prints once a file has been fetched.
const POSTPROCESSOR_TAGS: [&str; 4] = [
    "[Merger]",
    "[ExtractAudio]",
    "[FixupM3u8]",
    "[VideoConvertor]",
];

/// `downloaded / total * 100`, clamped to `0..=100`. No total means 0.
pub fn percent(downloaded: u64, total: Option<u64>) -> f32 {
    match total {
        Some(total) if total > 0 => {
            ((downloaded as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as f32
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
    pub total_estimate: Option<u64>,
    /// Bytes per second.
    pub speed: Option<f64>,
    /// Seconds.
    pub eta: Option<u64>,
}

impl DownloadProgress {
    pub fn total_bytes(&self) -> Option<u64> {
        self.total.filter(|t| *t > 0).or(self.total_estimate)
    }

    pub fn percent(&self) -> f32 {
        percent(self.downloaded, self.total_bytes())
    }

    pub fn speed_label(&self) -> String {
        format!("{:.1} KB/s", self.speed.unwrap_or(0.0) / 1024.0)
    }

    pub fn eta_label(&self) -> String {
        format!("{}s", self.eta.unwrap_or(0))
    }

    pub fn describe(&self, percent: f32) -> String {
        format!(
            "Downloading... {}% | {} | ETA: {}",
            percent as u32,
            self.speed_label(),
            self.eta_label()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    Downloading(DownloadProgress),
    /// One file is fully fetched; post-processing may follow.
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputLine {
    Progress(ProgressUpdate),
    OutputFile(PathBuf),
    PostProcessing(String),
    Other(String),
}

pub fn classify_line(line: &str) -> OutputLine {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(update) = parse_progress_line(line) {
        return OutputLine::Progress(update);
    }
    if let Some(path) = line.strip_prefix(OUTPUT_PREFIX) {
        let path = path.trim();
        if !path.is_empty() && path != "NA" {
            return OutputLine::OutputFile(PathBuf::from(path));
        }
    }
    let trimmed = line.trim_start();
    if POSTPROCESSOR_TAGS.iter().any(|tag| trimmed.starts_with(tag)) {
        return OutputLine::PostProcessing(trimmed.to_string());
    }
    OutputLine::Other(line.to_string())
}

pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    let rest = line.trim().strip_prefix(PROGRESS_PREFIX)?;
    let mut fields = rest.split('|');
    let status = fields.next()?.trim();

    match status {
        "finished" => Some(ProgressUpdate::Finished),
        "downloading" => {
            let downloaded = parse_number(fields.next()).map(|v| v as u64).unwrap_or(0);
            let total = parse_number(fields.next()).map(|v| v as u64);
            let total_estimate = parse_number(fields.next()).map(|v| v as u64);
            let speed = parse_number(fields.next());
            let eta = parse_number(fields.next()).map(|v| v as u64);
            Some(ProgressUpdate::Downloading(DownloadProgress {
                downloaded,
                total,
                total_estimate,
                speed,
                eta,
            }))
        }
        _ => None,
    }
}

fn parse_number(field: Option<&str>) -> Option<f64> {
    let raw = field?.trim();
    if raw.is_empty() || raw == "NA" || raw == "None" {
        return None;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Keeps the reported percentage from moving backwards while one file downloads.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: f32,
}

impl ProgressTracker {
    pub fn observe(&mut self, progress: &DownloadProgress) -> f32 {
        self.last = self.last.max(progress.percent());
        self.last
    }

    pub fn finish_file(&mut self) {
        self.last = 0.0;
    }
}
