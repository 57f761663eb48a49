//! flowcore - the Telegram-independent half of the MusicFlow bot
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, process helpers and text utilities
//! - `spotify`: link parsing and the Spotify Web API client
//! - `download`: quality tiers and the bounded yt-dlp audio fetcher
//! - `demo`: the rotating demo track catalog

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod core;
pub mod demo;
pub mod download;
pub mod spotify;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use demo::DemoSongs;
pub use download::{AudioFetcher, DownloadError, DownloadedFile, FetchRequest, QualityTier};
pub use spotify::{parse_link, EntityKind, Metadata, MetadataError, SpotifyClient, SpotifyLink};
