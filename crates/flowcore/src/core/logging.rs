//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the effective configuration (no secrets)

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already installed
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

fn presence(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "❌ not set"
    } else {
        "✅ set"
    }
}

/// Logs the effective configuration at application startup.
///
/// Secrets are reported only as set / not set.
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🎵 MusicFlow configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("TELEGRAM_BOT_TOKEN:    {}", presence(&config::BOT_TOKEN));
    log::info!("SPOTIFY_CLIENT_ID:     {}", presence(&config::SPOTIFY_CLIENT_ID));
    log::info!("SPOTIFY_CLIENT_SECRET: {}", presence(&config::SPOTIFY_CLIENT_SECRET));
    log::info!("yt-dlp binary:         {}", config::YTDL_BIN.as_str());
    log::info!("Concurrent downloads:  {}", *config::download::CONCURRENT_DOWNLOADS);
    log::info!("Download timeout:      {}s", *config::download::TIMEOUT_SECS);
    log::info!("Max playlist size:     {}", *config::playlist::MAX_PLAYLIST_SIZE);
    match config::TEMP_FILES_DIR.as_deref() {
        Some(dir) => log::info!("Temp files dir:        {}", dir),
        None => log::info!("Temp files dir:        {}", std::env::temp_dir().display()),
    }
    if let Some(url) = config::BOT_API_URL.as_deref() {
        log::info!("Bot API server:        {}", url);
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
