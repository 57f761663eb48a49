use thiserror::Error;

use crate::download::DownloadError;
use crate::spotify::{LinkError, MetadataError};

/// Centralized error type for the application
///
/// Component errors (`LinkError`, `MetadataError`, `DownloadError`) convert into
/// this enum with `?`, so callers that only need to report a failure can work
/// with a single type.
///
/// # Example
///
/// ```no_run
/// use flowcore::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spotify link could not be parsed
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Spotify Web API errors
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Download/yt-dlp errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Validation(err.to_string())
    }
}
