//! Spotify side of the pipeline: link parsing and Web API metadata lookup.

pub mod client;
pub mod link;
pub mod models;

pub use client::{MetadataError, SpotifyClient, SpotifyCredentials};
pub use link::{is_spotify_link, parse_link, validate_spotify_url, LinkError, SpotifyLink};
pub use models::{AlbumInfo, EntityKind, Metadata, PlaylistInfo, TrackInfo};
