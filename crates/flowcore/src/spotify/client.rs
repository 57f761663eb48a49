//! Spotify Web API client (client-credentials flow).
//!
//! Tokens are cached in memory and refreshed 30 seconds before they expire.
//! Both base URLs can be overridden so tests can point the client at a mock
//! server.

use reqwest::{header, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use super::link::SpotifyLink;
use super::models::{
    first_image, join_artists, AlbumInfo, ApiAlbum, ApiErrorBody, ApiPage, ApiPlaylist, ApiPlaylistItem,
    ApiSearchResponse, ApiTrack, EntityKind, Metadata, PlaylistInfo, TokenResponse, TrackInfo,
};
use crate::core::config;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Tokens are treated as expired this long before Spotify says they are.
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("not found")]
    NotFound,
    #[error("authentication with Spotify failed: {0}")]
    Auth(String),
    #[error("rate limited by Spotify (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },
    #[error("Spotify API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected Spotify response: {0}")]
    Decode(String),
}

impl MetadataError {
    /// Short stable label for logs.
    pub fn subcategory(&self) -> &'static str {
        match self {
            MetadataError::NotFound => "not_found",
            MetadataError::Auth(_) => "auth",
            MetadataError::RateLimited { .. } => "rate_limited",
            MetadataError::Api { .. } => "api",
            MetadataError::Http(_) => "http",
            MetadataError::Decode(_) => "decode",
        }
    }
}

/// Application credentials for the client-credentials flow.
#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl SpotifyCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_in: Duration,
    created_at: Instant,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.expires_in.saturating_sub(TOKEN_EXPIRY_BUFFER)
    }
}

pub struct SpotifyClient {
    http: reqwest::Client,
    credentials: SpotifyCredentials,
    api_base: String,
    token_url: String,
    max_playlist_size: usize,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    /// Creates a client against the public Spotify endpoints.
    pub fn new(credentials: SpotifyCredentials) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .timeout(config::network::spotify_timeout())
            .build()?;

        Ok(Self {
            http,
            credentials,
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            max_playlist_size: *config::playlist::MAX_PLAYLIST_SIZE,
            token: Mutex::new(None),
        })
    }

    /// Overrides the Web API base URL (no trailing slash).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the accounts token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_max_playlist_size(mut self, max: usize) -> Self {
        self.max_playlist_size = max.max(1);
        self
    }

    pub fn max_playlist_size(&self) -> usize {
        self.max_playlist_size
    }

    /// Returns a valid access token, requesting a new one when the cached
    /// token is missing or about to expire.
    async fn access_token(&self) -> Result<String, MetadataError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        log::debug!("Requesting new Spotify access token");
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Spotify token request failed: {} - {}", status, body);
            return Err(MetadataError::Auth(format!("{} {}", status.as_u16(), body.trim())));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Decode(format!("token response: {}", e)))?;

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_in: Duration::from_secs(token.expires_in),
            created_at: Instant::now(),
        });

        Ok(access_token)
    }

    /// Maps a non-success response to the matching `MetadataError`.
    async fn error_from_response(response: Response) -> MetadataError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);

        match status {
            StatusCode::NOT_FOUND => MetadataError::NotFound,
            StatusCode::BAD_REQUEST if message.to_lowercase().contains("invalid") => MetadataError::NotFound,
            StatusCode::TOO_MANY_REQUESTS => MetadataError::RateLimited { retry_after },
            _ => MetadataError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, MetadataError> {
        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).query(query).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MetadataError::Decode(e.to_string()))
    }

    /// Fetches a single track.
    pub async fn get_track(&self, track_id: &str) -> Result<TrackInfo, MetadataError> {
        let url = format!("{}/tracks/{}", self.api_base, track_id);
        let track: ApiTrack = self.get_json(&url, &[]).await?;
        let info = track.into_info(None);
        log::info!("Retrieved track info for: {} - {}", info.artist, info.name);
        Ok(info)
    }

    /// Fetches a playlist and its tracks, following pagination.
    ///
    /// Removed entries and non-track items (podcast episodes) are skipped.
    /// At most `max_playlist_size` tracks are returned.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistInfo, MetadataError> {
        let url = format!("{}/playlists/{}", self.api_base, playlist_id);
        let playlist: ApiPlaylist = self.get_json(&url, &[]).await?;

        let mut tracks = Vec::new();
        let mut page = playlist.tracks;
        loop {
            for item in page.items {
                let Some(track) = item.track else { continue };
                if !track.is_track() {
                    continue;
                }
                tracks.push(track.into_info(None));
                if tracks.len() >= self.max_playlist_size {
                    break;
                }
            }

            if tracks.len() >= self.max_playlist_size {
                log::info!("Playlist {} capped at {} tracks", playlist_id, self.max_playlist_size);
                break;
            }
            match page.next {
                Some(next) => page = self.get_json::<ApiPage<ApiPlaylistItem>>(&next, &[]).await?,
                None => break,
            }
        }

        let owner = playlist
            .owner
            .and_then(|o| o.display_name.or(o.id))
            .unwrap_or_default();

        log::info!("Retrieved playlist info: {} ({} tracks)", playlist.name, tracks.len());
        Ok(PlaylistInfo {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description.unwrap_or_default(),
            owner,
            tracks,
            followers: playlist.followers.map(|f| f.total).unwrap_or(0),
            image_url: first_image(&playlist.images),
        })
    }

    /// Fetches an album and its tracks. Tracks inherit the album name.
    pub async fn get_album(&self, album_id: &str) -> Result<AlbumInfo, MetadataError> {
        let url = format!("{}/albums/{}", self.api_base, album_id);
        let album: ApiAlbum = self.get_json(&url, &[]).await?;

        let mut tracks = Vec::new();
        let mut page = album.tracks;
        loop {
            tracks.extend(page.items.into_iter().map(|t| t.into_info(Some(&album.name))));
            if tracks.len() >= self.max_playlist_size {
                tracks.truncate(self.max_playlist_size);
                break;
            }
            match page.next {
                Some(next) => page = self.get_json::<ApiPage<ApiTrack>>(&next, &[]).await?,
                None => break,
            }
        }

        log::info!("Retrieved album info: {} ({} tracks)", album.name, tracks.len());
        Ok(AlbumInfo {
            id: album.id,
            artist: join_artists(&album.artists),
            total_tracks: album.total_tracks,
            release_date: album.release_date,
            genres: album.genres,
            popularity: album.popularity,
            image_url: first_image(&album.images),
            name: album.name,
            tracks,
        })
    }

    /// Searches Spotify for tracks matching `query`.
    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackInfo>, MetadataError> {
        let url = format!("{}/search", self.api_base);
        let params = [
            ("q", query.to_string()),
            ("type", "track".to_string()),
            ("limit", limit.clamp(1, 50).to_string()),
        ];
        let response: ApiSearchResponse = self.get_json(&url, &params).await?;

        let tracks: Vec<TrackInfo> = response.tracks.items.into_iter().map(|t| t.into_info(None)).collect();
        log::info!("Search returned {} results for query: {}", tracks.len(), query);
        Ok(tracks)
    }

    /// Resolves a parsed link to its metadata.
    pub async fn resolve(&self, link: &SpotifyLink) -> Result<Metadata, MetadataError> {
        match link.kind {
            EntityKind::Track => self.get_track(&link.id).await.map(Metadata::Track),
            EntityKind::Playlist => self.get_playlist(&link.id).await.map(Metadata::Playlist),
            EntityKind::Album => self.get_album(&link.id).await.map(Metadata::Album),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_expiry_buffer() {
        let fresh = CachedToken {
            access_token: "t".into(),
            expires_in: Duration::from_secs(3600),
            created_at: Instant::now(),
        };
        assert!(!fresh.is_expired());

        // Inside the 30 second buffer counts as expired
        let short = CachedToken {
            access_token: "t".into(),
            expires_in: Duration::from_secs(20),
            created_at: Instant::now(),
        };
        assert!(short.is_expired());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = SpotifyCredentials::new("id", "very-secret");
        assert!(!format!("{:?}", creds).contains("very-secret"));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = SpotifyClient::new(SpotifyCredentials::new("id", "secret"))
            .unwrap()
            .with_api_base("http://localhost:1234/v1/")
            .with_max_playlist_size(0);
        assert_eq!(client.api_base, "http://localhost:1234/v1");
        assert_eq!(client.max_playlist_size(), 1);
    }

    #[test]
    fn test_subcategory_labels() {
        assert_eq!(MetadataError::NotFound.subcategory(), "not_found");
        assert_eq!(MetadataError::RateLimited { retry_after: None }.subcategory(), "rate_limited");
    }
}
