//! Metadata records returned by the Spotify client, and the raw Web API
//! shapes they are built from.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::utils::format_duration_ms;

/// Kind of Spotify entity a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Track,
    Playlist,
    Album,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Playlist => "playlist",
            EntityKind::Album => "album",
        }
    }

    /// Capitalised name used in chat messages ("Track not found!").
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Track => "Track",
            EntityKind::Playlist => "Playlist",
            EntityKind::Album => "Album",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "track" => Some(EntityKind::Track),
            "playlist" => Some(EntityKind::Playlist),
            "album" => Some(EntityKind::Album),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single track as shown to the user and handed to the audio fetcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    /// All artist names joined with `", "`
    pub artist: String,
    pub album: String,
    /// `M:SS`
    pub duration: String,
    pub duration_ms: u64,
    pub popularity: Option<u32>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub external_url: Option<String>,
    /// Position on the album (album tracks only)
    pub track_number: Option<u32>,
}

impl TrackInfo {
    /// Duration in whole seconds, as Telegram's `sendAudio` expects it.
    pub fn duration_secs(&self) -> u32 {
        u32::try_from(self.duration_ms / 1000).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub tracks: Vec<TrackInfo>,
    pub followers: u64,
    pub image_url: Option<String>,
}

impl PlaylistInfo {
    pub fn total_tracks(&self) -> usize {
        self.tracks.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumInfo {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub tracks: Vec<TrackInfo>,
    /// Track count reported by Spotify (may exceed `tracks.len()` when capped)
    pub total_tracks: u32,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
    pub image_url: Option<String>,
}

/// Resolved metadata for any supported link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Metadata {
    Track(TrackInfo),
    Playlist(PlaylistInfo),
    Album(AlbumInfo),
}

impl Metadata {
    pub fn kind(&self) -> EntityKind {
        match self {
            Metadata::Track(_) => EntityKind::Track,
            Metadata::Playlist(_) => EntityKind::Playlist,
            Metadata::Album(_) => EntityKind::Album,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Metadata::Track(t) => &t.name,
            Metadata::Playlist(p) => &p.name,
            Metadata::Album(a) => &a.name,
        }
    }

    /// Tracks to download for this entity, in order.
    pub fn tracks(&self) -> &[TrackInfo] {
        match self {
            Metadata::Track(t) => std::slice::from_ref(t),
            Metadata::Playlist(p) => &p.tracks,
            Metadata::Album(a) => &a.tracks,
        }
    }
}

// ---- Raw Web API shapes ----

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiImage {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlbumRef {
    pub name: String,
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ApiImage>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
    pub album: Option<ApiAlbumRef>,
    #[serde(default)]
    pub duration_ms: u64,
    pub popularity: Option<u32>,
    #[serde(default)]
    pub external_urls: Option<ApiExternalUrls>,
    pub track_number: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPlaylistItem {
    pub track: Option<ApiTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiOwner {
    pub display_name: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiFollowers {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: Option<ApiOwner>,
    pub followers: Option<ApiFollowers>,
    #[serde(default)]
    pub images: Option<Vec<ApiImage>>,
    pub tracks: ApiPage<ApiPlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
    pub tracks: ApiPage<ApiTrack>,
    #[serde(default)]
    pub total_tracks: u32,
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
    #[serde(default)]
    pub images: Option<Vec<ApiImage>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSearchResponse {
    pub tracks: ApiPage<ApiTrack>,
}

pub(crate) fn join_artists(artists: &[ApiArtist]) -> String {
    artists.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
}

pub(crate) fn first_image(images: &Option<Vec<ApiImage>>) -> Option<String> {
    images.as_ref().and_then(|imgs| imgs.first()).map(|img| img.url.clone())
}

impl ApiTrack {
    pub fn is_track(&self) -> bool {
        self.kind.as_deref().map_or(true, |k| k == "track")
    }

    /// Converts to a `TrackInfo`; `album_name` overrides the embedded album
    /// (album endpoints return simplified tracks without one).
    pub fn into_info(self, album_name: Option<&str>) -> TrackInfo {
        let (album, release_date, image_url) = match &self.album {
            Some(a) => (a.name.clone(), a.release_date.clone(), first_image(&a.images)),
            None => (String::new(), None, None),
        };

        TrackInfo {
            id: self.id.unwrap_or_default(),
            artist: join_artists(&self.artists),
            album: album_name.map(str::to_string).unwrap_or(album),
            duration: format_duration_ms(self.duration_ms),
            duration_ms: self.duration_ms,
            popularity: self.popularity,
            release_date,
            image_url,
            external_url: self.external_urls.and_then(|u| u.spotify),
            track_number: self.track_number,
            name: self.name,
        }
    }
}
