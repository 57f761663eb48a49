//! Audio download: quality tiers, the bounded fetcher and its sources.

pub mod error;
pub mod fetcher;
pub mod quality;
pub mod source;
pub mod ytdlp_errors;

pub use crate::core::utils::create_search_query;
pub use error::DownloadError;
pub use fetcher::{AudioFetcher, DownloadedFile, FetchRequest, FetcherConfig};
pub use quality::QualityTier;
pub use source::{AudioSource, SourceRequest, YtDlpSource};
