//! Audio source abstraction.
//!
//! The fetcher never talks to yt-dlp directly: it hands a [`SourceRequest`] to
//! an [`AudioSource`]. Production uses [`YtDlpSource`]; tests plug in their own.

pub mod ytdlp;

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use super::error::DownloadError;
use super::quality::QualityTier;

pub use ytdlp::YtDlpSource;

/// One search-and-download job.
#[derive(Debug, Clone)]
pub struct SourceRequest {
    /// Free-text search query ("title artist")
    pub query: String,
    pub quality: QualityTier,
    /// yt-dlp style output template ending in `.%(ext)s`
    pub output_template: PathBuf,
    /// Upper bound for the whole job
    pub timeout: Duration,
}

/// Something that can search for audio and write it next to the template.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Human-readable name of this source (e.g. "yt-dlp")
    fn name(&self) -> &str;

    /// Searches for `request.query` and downloads the best match.
    ///
    /// On success a file named after the template stem (with any audio
    /// extension) exists in the template's directory, or nothing was found.
    async fn fetch(&self, request: &SourceRequest) -> Result<(), DownloadError>;
}
