use thiserror::Error;

use super::ytdlp_errors::{get_error_message, YtDlpErrorType};

/// Structured error type for audio downloads.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The search produced no downloadable match
    #[error("no match found")]
    NoMatch,
    /// The downloader ran past the configured timeout and was killed
    #[error("download timed out after {0}s")]
    Timeout(u64),
    /// yt-dlp exited with a non-zero status
    #[error("yt-dlp failed ({}): {stderr}", .kind.as_str())]
    YtDlp { kind: YtDlpErrorType, stderr: String },
    /// yt-dlp reported success but the expected file is missing
    #[error("downloaded file not found")]
    FileNotFound,
    /// The downloader process could not be started
    #[error("failed to run downloader: {0}")]
    Process(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::NoMatch => "no_match",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::YtDlp { .. } => "ytdlp",
            DownloadError::FileNotFound => "file_not_found",
            DownloadError::Process(_) => "process",
            DownloadError::Io(_) => "io",
        }
    }

    /// Short explanation suitable for a chat message.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::NoMatch => get_error_message(YtDlpErrorType::NoResults).to_string(),
            DownloadError::Timeout(secs) => format!("The download took longer than {}s and was stopped.", secs),
            DownloadError::YtDlp { kind, .. } => get_error_message(*kind).to_string(),
            DownloadError::FileNotFound | DownloadError::Process(_) | DownloadError::Io(_) => {
                get_error_message(YtDlpErrorType::Unknown).to_string()
            }
        }
    }
}
