use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Please enter a video URL.")]
    MissingUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Destination is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Could not create {}: {source}", path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("yt-dlp not found. Please install it and make sure it's in your PATH.")]
    DownloaderMissing,

    #[error("Failed to start yt-dlp: {0}")]
    Spawn(#[source] io::Error),

    #[error("Download failed: {0}")]
    Failed(String),

    #[error("Failed to read yt-dlp output: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DownloadError>;
