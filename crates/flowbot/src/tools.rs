//! `resolve` and `fetch` subcommands: the link-to-file pipeline without Telegram

use std::path::{Path, PathBuf};
use std::sync::Arc;

use flowcore::config;
use flowcore::core::utils::format_file_size;
use flowcore::download::{FetcherConfig, YtDlpSource};
use flowcore::spotify::SpotifyCredentials;
use flowcore::{parse_link, AppError, AppResult, AudioFetcher, EntityKind, FetchRequest, Metadata, QualityTier, SpotifyClient};

/// Spotify client built from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`.
pub fn spotify_client_from_env() -> AppResult<SpotifyClient> {
    if config::SPOTIFY_CLIENT_ID.trim().is_empty() || config::SPOTIFY_CLIENT_SECRET.trim().is_empty() {
        return Err(AppError::Config(
            "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set".to_string(),
        ));
    }
    let credentials = SpotifyCredentials::new(config::SPOTIFY_CLIENT_ID.trim(), config::SPOTIFY_CLIENT_SECRET.trim());
    Ok(SpotifyClient::new(credentials)?.with_max_playlist_size(*config::playlist::MAX_PLAYLIST_SIZE))
}

/// yt-dlp backed fetcher configured from the environment.
pub fn fetcher_from_env() -> AppResult<AudioFetcher> {
    Ok(AudioFetcher::with_config(
        Arc::new(YtDlpSource::new()),
        FetcherConfig::from_env(),
    )?)
}

pub async fn resolve_link(client: &SpotifyClient, url: &str) -> AppResult<Metadata> {
    let link = parse_link(url)?;
    Ok(client.resolve(&link).await?)
}

/// Human-readable summary printed by `musicflow resolve`.
pub fn render_metadata(metadata: &Metadata) -> String {
    let mut out = match metadata {
        Metadata::Track(t) => format!(
            "Track: {}\nArtist: {}\nAlbum: {}\nDuration: {}",
            t.name, t.artist, t.album, t.duration
        ),
        Metadata::Playlist(p) => format!(
            "Playlist: {}\nOwner: {}\nFollowers: {}\nTracks: {}",
            p.name,
            p.owner,
            p.followers,
            p.tracks.len()
        ),
        Metadata::Album(a) => format!(
            "Album: {}\nArtist: {}\nTracks: {}/{}",
            a.name,
            a.artist,
            a.tracks.len(),
            a.total_tracks
        ),
    };

    if metadata.kind() != EntityKind::Track {
        for (i, track) in metadata.tracks().iter().enumerate() {
            out.push_str(&format!("\n{:>3}. {} - {} ({})", i + 1, track.artist, track.name, track.duration));
        }
    }
    out
}

/// Resolves a track link, downloads it and moves the file into `output`.
pub async fn fetch_track(
    client: &SpotifyClient,
    fetcher: &AudioFetcher,
    url: &str,
    quality: QualityTier,
    output: &Path,
) -> AppResult<PathBuf> {
    let link = parse_link(url)?;
    if link.kind != EntityKind::Track {
        return Err(AppError::Validation(format!(
            "fetch only supports track links, got a {}",
            link.kind
        )));
    }

    let track = client.get_track(&link.id).await?;
    log::info!("Fetching '{}' by {} at {}", track.name, track.artist, quality);

    let file = fetcher
        .fetch(&FetchRequest::new(track.name.clone(), track.artist.clone(), quality))
        .await?;
    log::info!("Downloaded {} ({})", file.file_name(), format_file_size(file.size()));

    std::fs::create_dir_all(output)?;
    Ok(file.persist_to(output)?)
}

pub async fn run_resolve(url: &str, json: bool) -> anyhow::Result<()> {
    let client = spotify_client_from_env()?;
    let metadata = resolve_link(&client, url).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("{}", render_metadata(&metadata));
    }
    Ok(())
}

pub async fn run_fetch(url: &str, quality: &str, output: &Path) -> anyhow::Result<()> {
    let quality: QualityTier = quality.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let client = spotify_client_from_env()?;
    let fetcher = fetcher_from_env()?;
    let path = fetch_track(&client, &fetcher, url, quality, output).await?;
    println!("{}", path.display());
    Ok(())
}
