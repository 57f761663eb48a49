//! Bounded, hash-named audio downloads into a private temporary directory.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use super::error::DownloadError;
use super::quality::QualityTier;
use super::source::{AudioSource, SourceRequest};
use crate::core::config;
use crate::core::utils::{create_search_query, format_file_size, sanitize_filename};

/// Extensions checked, in order, next to the output template.
const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "m4a", "webm", "ogg", "opus"];

const TEMP_DIR_PREFIX: &str = "music_bot_";

/// Room left for the hash suffix and extension within the file name limit.
const MAX_STEM_BASE_LEN: usize = 180;

/// What to download.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub title: String,
    pub artist: String,
    pub quality: QualityTier,
}

impl FetchRequest {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, quality: QualityTier) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            quality,
        }
    }
}

/// A downloaded audio file. The file is deleted when this handle is dropped.
#[derive(Debug)]
pub struct DownloadedFile {
    path: PathBuf,
    size: u64,
    armed: bool,
}

impl DownloadedFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Moves the file into `dir` and hands ownership of it to the caller.
    pub fn persist_to(mut self, dir: &Path) -> std::io::Result<PathBuf> {
        let target = dir.join(self.file_name());
        if std::fs::rename(&self.path, &target).is_err() {
            // Different file system
            std::fs::copy(&self.path, &target)?;
            std::fs::remove_file(&self.path)?;
        }
        self.armed = false;
        remove_job_dir(&self.path);
        Ok(target)
    }
}

impl Drop for DownloadedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed temp file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove temp file {}: {}", self.path.display(), e),
        }
        remove_job_dir(&self.path);
    }
}

/// Removes the per-job directory holding `file` once it is empty.
fn remove_job_dir(file: &Path) {
    if let Some(dir) = file.parent() {
        let _ = std::fs::remove_dir(dir);
    }
}

/// Fetcher settings; [`FetcherConfig::from_env`] reads the usual variables.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub max_concurrent: usize,
    pub timeout: Duration,
    /// Parent for the `music_bot_*` directory; system temp dir when `None`
    pub temp_parent: Option<PathBuf>,
}

impl FetcherConfig {
    pub fn from_env() -> Self {
        Self {
            max_concurrent: *config::download::CONCURRENT_DOWNLOADS,
            timeout: config::download::timeout(),
            temp_parent: config::TEMP_FILES_DIR.as_ref().map(PathBuf::from),
        }
    }
}

/// Decrements the active-download counter when a fetch ends.
struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct AudioFetcher {
    source: Arc<dyn AudioSource>,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
    active: AtomicUsize,
    job_seq: AtomicUsize,
    timeout: Duration,
    temp_dir: TempDir,
}

impl AudioFetcher {
    /// Creates a fetcher with settings from the environment.
    pub fn new(source: Arc<dyn AudioSource>) -> Result<Self, DownloadError> {
        Self::with_config(source, FetcherConfig::from_env())
    }

    pub fn with_config(source: Arc<dyn AudioSource>, cfg: FetcherConfig) -> Result<Self, DownloadError> {
        let max_concurrent = cfg.max_concurrent.max(1);
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_DIR_PREFIX);
        let temp_dir = match cfg.temp_parent {
            Some(parent) => {
                std::fs::create_dir_all(&parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        log::info!(
            "Audio fetcher ready: source={}, max_concurrent={}, timeout={}s, temp_dir={}",
            source.name(),
            max_concurrent,
            cfg.timeout.as_secs(),
            temp_dir.path().display()
        );

        Ok(Self {
            source,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            active: AtomicUsize::new(0),
            job_seq: AtomicUsize::new(0),
            timeout: cfg.timeout,
            temp_dir,
        })
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Downloads currently holding a permit.
    pub fn active_downloads(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Searches for the track and downloads it at the requested quality.
    ///
    /// Waits for a free slot first; at most `max_concurrent` fetches run at
    /// once and each keeps its slot until the file is on disk.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<DownloadedFile, DownloadError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DownloadError::Process("download slots closed".to_string()))?;
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let _active = ActiveGuard(&self.active);

        let query = create_search_query(&request.title, &request.artist);
        if query.is_empty() {
            return Err(DownloadError::NoMatch);
        }

        log::info!(
            "Downloading '{}' at {} ({}/{} active)",
            query,
            request.quality,
            active,
            self.max_concurrent
        );

        let job = self.job_seq.fetch_add(1, Ordering::SeqCst);
        let job_dir = self.temp_dir.path().join(format!("job_{}", job));
        tokio::fs::create_dir_all(&job_dir).await?;

        let stem = output_stem(&request.title, &request.artist, &query);
        let source_request = SourceRequest {
            query: query.clone(),
            quality: request.quality,
            // yt-dlp treats '%' as a template field marker
            output_template: job_dir.join(format!("{}.%(ext)s", stem.replace('%', "%%"))),
            timeout: self.timeout,
        };

        if let Err(e) = self.source.fetch(&source_request).await {
            cleanup_dir(&job_dir).await;
            return Err(e);
        }

        let located = match locate_output(&job_dir, &stem) {
            Ok(located) => located,
            Err(e) => {
                cleanup_dir(&job_dir).await;
                return Err(e.into());
            }
        };

        match located {
            Located::Found(path) => {
                let size = match tokio::fs::metadata(&path).await {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        cleanup_dir(&job_dir).await;
                        return Err(e.into());
                    }
                };
                log::info!("Downloaded {} ({})", path.display(), format_file_size(size));
                Ok(DownloadedFile::new(path, size))
            }
            Located::Empty => {
                cleanup_dir(&job_dir).await;
                log::warn!("No match found for '{}'", query);
                Err(DownloadError::NoMatch)
            }
            Located::Missing => {
                cleanup_dir(&job_dir).await;
                log::error!("Download of '{}' produced no file named {}", query, stem);
                Err(DownloadError::FileNotFound)
            }
        }
    }

    /// Removes every leftover file from the temporary directory.
    ///
    /// The directory itself goes away when the fetcher is dropped.
    pub fn cleanup_all(&self) -> usize {
        let mut removed = 0;
        let Ok(entries) = std::fs::read_dir(self.temp_dir.path()) else {
            return 0;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let result = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
        log::info!("Cleaned up {} temp entries in {}", removed, self.temp_dir.path().display());
        removed
    }
}

/// `"<title> - <artist> [<hash8>]"`, sanitized for the file system.
///
/// `hash8` is the first 8 hex characters of the SHA-256 of the search query.
pub fn output_stem(title: &str, artist: &str, query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    let hash = hex::encode(digest);
    let base: String = sanitize_filename(&format!("{} - {}", title, artist))
        .chars()
        .take(MAX_STEM_BASE_LEN)
        .collect();
    format!("{} [{}]", base.trim_end(), &hash[..8])
}

enum Located {
    Found(PathBuf),
    /// Nothing at all was written
    Empty,
    /// Files exist but none match the stem
    Missing,
}

fn locate_output(dir: &Path, stem: &str) -> std::io::Result<Located> {
    for ext in AUDIO_EXTENSIONS {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate.is_file() {
            return Ok(Located::Found(candidate));
        }
    }

    let mut saw_any = false;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        saw_any = true;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(stem) && !name.ends_with(".part") && entry.path().is_file() {
            return Ok(Located::Found(entry.path()));
        }
    }

    Ok(if saw_any { Located::Missing } else { Located::Empty })
}

/// Removes whatever is left at a job path, directory or not.
async fn cleanup_dir(dir: &Path) {
    let result = match tokio::fs::symlink_metadata(dir).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(dir).await,
        Ok(_) => tokio::fs::remove_file(dir).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("Failed to remove {}: {}", dir.display(), e);
        }
    }
}
