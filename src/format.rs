//! Quality label to yt-dlp format selector lookup.
//!
//! Each known height prefers an H.264 video stream plus best audio, then the
//! best single file under that height, then any video+audio pair.

use crate::models::Quality;

pub const AUDIO_FORMAT_SELECTOR: &str = "bestaudio/best";

/// Used when the label is not in the table.
pub const DEFAULT_VIDEO_SELECTOR: &str = "bestvideo+bestaudio/best";

const VIDEO_SELECTORS: [(&str, &str); 4] = [
    (
        "360p",
        "bv*[vcodec^=avc1][height<=360]+ba/best[height<=360]/bestvideo[height<=360]+bestaudio/best",
    ),
    (
        "720p",
        "bv*[vcodec^=avc1][height<=720]+ba/best[height<=720]/bestvideo[height<=720]+bestaudio/best",
    ),
    (
        "1080p",
        "bv*[vcodec^=avc1][height<=1080]+ba/best[height<=1080]/bestvideo[height<=1080]+bestaudio/best",
    ),
    ("Best", "bv*[vcodec^=avc1]+ba/bestvideo+bestaudio/best"),
];

pub fn video_format_selector(label: &str) -> &'static str {
    VIDEO_SELECTORS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, selector)| *selector)
        .unwrap_or(DEFAULT_VIDEO_SELECTOR)
}

pub fn selector_for(quality: Quality) -> &'static str {
    video_format_selector(quality.label())
}
