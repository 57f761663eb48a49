use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::core::error::AppError;

/// Configuration values for the bot.
///
/// Every value is read once from the environment on first access. Call
/// `dotenvy::dotenv()` before touching any of them if a `.env` file is used.
///
/// Telegram bot token.
/// Read from TELEGRAM_BOT_TOKEN, falling back to BOT_TOKEN / TELOXIDE_TOKEN
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("TELEGRAM_BOT_TOKEN")
        .or_else(|_| env::var("BOT_TOKEN"))
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Spotify application client ID (client-credentials flow)
pub static SPOTIFY_CLIENT_ID: Lazy<String> = Lazy::new(|| env::var("SPOTIFY_CLIENT_ID").unwrap_or_default());

/// Spotify application client secret (client-credentials flow)
pub static SPOTIFY_CLIENT_SECRET: Lazy<String> =
    Lazy::new(|| env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default());

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Parent directory for the fetcher's scratch directory.
/// Read from TEMP_FILES_DIR; defaults to the system temp dir
pub static TEMP_FILES_DIR: Lazy<Option<String>> =
    Lazy::new(|| env::var("TEMP_FILES_DIR").ok().filter(|s| !s.trim().is_empty()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: musicflow.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "musicflow.log".to_string()));

/// Custom Bot API server URL (optional, e.g. a local telegram-bot-api instance)
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Reads a numeric environment variable, falling back to `default` when the
/// variable is unset, unparsable or zero.
fn env_positive<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + PartialEq + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
        .unwrap_or(default)
}

/// Download configuration
pub mod download {
    use super::{env_positive, Duration, Lazy};

    /// Default number of downloads allowed to run at the same time
    pub const DEFAULT_CONCURRENT_DOWNLOADS: usize = 3;

    /// Default timeout for a single yt-dlp search-and-fetch (in seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Maximum number of concurrent downloads.
    /// Read from CONCURRENT_DOWNLOADS
    pub static CONCURRENT_DOWNLOADS: Lazy<usize> =
        Lazy::new(|| env_positive("CONCURRENT_DOWNLOADS", DEFAULT_CONCURRENT_DOWNLOADS));

    /// Timeout for one download, in seconds.
    /// Read from DOWNLOAD_TIMEOUT_SECS
    pub static TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| env_positive("DOWNLOAD_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS));

    /// yt-dlp socket timeout (seconds)
    pub const SOCKET_TIMEOUT_SECS: u32 = 20;

    /// yt-dlp retries for the whole request and for each fragment
    pub const RETRIES: u32 = 2;

    /// HTTP chunk size passed to yt-dlp (10 MiB)
    pub const HTTP_CHUNK_SIZE: &str = "10M";

    /// Download timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }
}

/// Playlist/album processing configuration
pub mod playlist {
    use super::{env_positive, Lazy};

    /// Default maximum number of tracks taken from a playlist
    pub const DEFAULT_MAX_PLAYLIST_SIZE: usize = 50;

    /// Maximum number of tracks taken from a playlist.
    /// Read from MAX_PLAYLIST_SIZE
    pub static MAX_PLAYLIST_SIZE: Lazy<usize> =
        Lazy::new(|| env_positive("MAX_PLAYLIST_SIZE", DEFAULT_MAX_PLAYLIST_SIZE));
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Spotify Web API calls (in seconds)
    pub const SPOTIFY_TIMEOUT_SECS: u64 = 15;

    /// Request timeout for Bot API calls (in seconds).
    /// Uploads of large audio files go through the same client.
    pub const BOT_API_TIMEOUT_SECS: u64 = 300;

    pub fn spotify_timeout() -> Duration {
        Duration::from_secs(SPOTIFY_TIMEOUT_SECS)
    }

    pub fn bot_api_timeout() -> Duration {
        Duration::from_secs(BOT_API_TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of dispatcher restarts after a panic
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Base delay between dispatcher restarts (seconds), doubled per attempt
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Number of get_me attempts while the Bot API is unreachable at startup
    pub const STARTUP_MAX_RETRIES: u32 = 12;

    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }
}

/// The three secrets the bot cannot start without.
#[derive(Clone)]
pub struct RequiredSecrets {
    pub bot_token: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
}

impl std::fmt::Debug for RequiredSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequiredSecrets")
            .field("bot_token", &"<redacted>")
            .field("spotify_client_id", &self.spotify_client_id)
            .field("spotify_client_secret", &"<redacted>")
            .finish()
    }
}

impl RequiredSecrets {
    /// Reads the required secrets from the cached config statics.
    ///
    /// # Errors
    /// Returns `AppError::Config` naming every missing variable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_values(BOT_TOKEN.as_str(), SPOTIFY_CLIENT_ID.as_str(), SPOTIFY_CLIENT_SECRET.as_str())
    }

    /// Validates explicit values (used by `from_env` and by tests).
    pub fn from_values(bot_token: &str, client_id: &str, client_secret: &str) -> Result<Self, AppError> {
        let missing: Vec<&str> = [
            ("TELEGRAM_BOT_TOKEN", bot_token),
            ("SPOTIFY_CLIENT_ID", client_id),
            ("SPOTIFY_CLIENT_SECRET", client_secret),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            bot_token: bot_token.trim().to_string(),
            spotify_client_id: client_id.trim().to_string(),
            spotify_client_secret: client_secret.trim().to_string(),
        })
    }
}
