//! Integration tests for the bounded audio fetcher.
//!
//! A scripted `AudioSource` stands in for yt-dlp so the tests can observe
//! concurrency and temp-file handling without network access.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flowcore::download::{
    AudioFetcher, AudioSource, DownloadError, FetchRequest, FetcherConfig, QualityTier, SourceRequest,
};

#[derive(Clone, Copy)]
enum Behaviour {
    /// Write `<stem>.m4a` after a short delay
    Write,
    /// Succeed without writing anything
    Nothing,
    /// Write a file with an unrelated name
    WrongName,
    Fail,
    /// Replace the job directory with a plain file so it cannot be listed
    ClobberDir,
}

struct ScriptedSource {
    behaviour: Behaviour,
    delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    last_template: std::sync::Mutex<Option<PathBuf>>,
}

impl ScriptedSource {
    fn new(behaviour: Behaviour, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            delay,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            last_template: std::sync::Mutex::new(None),
        })
    }
}

fn materialize(template: &Path, ext: &str) -> PathBuf {
    let rendered = template.to_string_lossy().replace("%(ext)s", ext).replace("%%", "%");
    PathBuf::from(rendered)
}

#[async_trait]
impl AudioSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<(), DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        *self.last_template.lock().unwrap() = Some(request.output_template.clone());

        tokio::time::sleep(self.delay).await;

        let result = match self.behaviour {
            Behaviour::Write => {
                std::fs::write(materialize(&request.output_template, "m4a"), b"fake audio").map_err(DownloadError::from)
            }
            Behaviour::Nothing => Ok(()),
            Behaviour::WrongName => {
                let dir = request.output_template.parent().unwrap();
                std::fs::write(dir.join("something-else.txt"), b"x").map_err(DownloadError::from)
            }
            Behaviour::Fail => Err(DownloadError::NoMatch),
            Behaviour::ClobberDir => {
                let dir = request.output_template.parent().unwrap();
                std::fs::remove_dir_all(dir).unwrap();
                std::fs::write(dir, b"not a directory").map_err(DownloadError::from)
            }
        };

        self.current.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn fetcher(source: Arc<ScriptedSource>, max_concurrent: usize, parent: &Path) -> AudioFetcher {
    AudioFetcher::with_config(
        source,
        FetcherConfig {
            max_concurrent,
            timeout: Duration::from_secs(5),
            temp_parent: Some(parent.to_path_buf()),
        },
    )
    .unwrap()
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_never_exceeds_cap() {
    let parent = tempfile::tempdir().unwrap();
    let source = ScriptedSource::new(Behaviour::Write, Duration::from_millis(80));
    let fetcher = Arc::new(fetcher(source.clone(), 2, parent.path()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let fetcher = fetcher.clone();
        handles.push(tokio::spawn(async move {
            let request = FetchRequest::new(format!("Song {i}"), "Artist", QualityTier::High);
            let file = fetcher.fetch(&request).await.unwrap();
            assert!(fetcher.active_downloads() <= fetcher.max_concurrent());
            file.size()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 10);
    }

    assert_eq!(source.calls.load(Ordering::SeqCst), 8);
    assert!(source.peak.load(Ordering::SeqCst) <= 2, "peak {}", source.peak.load(Ordering::SeqCst));
    assert_eq!(fetcher.active_downloads(), 0);
}

#[tokio::test]
async fn test_file_name_and_removal_on_drop() {
    let parent = tempfile::tempdir().unwrap();
    let source = ScriptedSource::new(Behaviour::Write, Duration::ZERO);
    let fetcher = fetcher(source.clone(), 3, parent.path());

    let request = FetchRequest::new("Hey Jude (Remastered 2015)", "The Beatles", QualityTier::Premium);
    let file = fetcher.fetch(&request).await.unwrap();

    let name = file.file_name();
    assert!(name.starts_with("Hey Jude (Remastered 2015) - The Beatles ["), "{name}");
    assert!(name.ends_with("].m4a"), "{name}");
    let path = file.path().to_path_buf();
    assert!(path.starts_with(fetcher.temp_dir()));
    assert!(path.exists());

    drop(file);
    assert!(!path.exists());
    assert!(dir_is_empty(fetcher.temp_dir()));
}

#[tokio::test]
async fn test_percent_in_title_is_escaped_for_template() {
    let parent = tempfile::tempdir().unwrap();
    let source = ScriptedSource::new(Behaviour::Write, Duration::ZERO);
    let fetcher = fetcher(source.clone(), 1, parent.path());

    let file = fetcher
        .fetch(&FetchRequest::new("100% Pure Love", "Crystal Waters", QualityTier::High))
        .await
        .unwrap();

    let template = source.last_template.lock().unwrap().clone().unwrap();
    assert!(template.to_string_lossy().contains("100%% Pure Love"));
    assert!(file.file_name().starts_with("100% Pure Love - Crystal Waters"));
}

#[tokio::test]
async fn test_nothing_downloaded_is_no_match() {
    let parent = tempfile::tempdir().unwrap();
    let fetcher = fetcher(ScriptedSource::new(Behaviour::Nothing, Duration::ZERO), 1, parent.path());

    let err = fetcher
        .fetch(&FetchRequest::new("Obscure", "Nobody", QualityTier::Standard))
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::NoMatch), "{err:?}");
    assert!(dir_is_empty(fetcher.temp_dir()));
}

#[tokio::test]
async fn test_unexpected_file_is_file_not_found_and_cleaned() {
    let parent = tempfile::tempdir().unwrap();
    let fetcher = fetcher(ScriptedSource::new(Behaviour::WrongName, Duration::ZERO), 1, parent.path());

    let err = fetcher
        .fetch(&FetchRequest::new("Song", "Artist", QualityTier::High))
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::FileNotFound), "{err:?}");
    assert!(dir_is_empty(fetcher.temp_dir()));
}

#[tokio::test]
async fn test_unreadable_job_dir_is_io_error_and_cleaned() {
    let parent = tempfile::tempdir().unwrap();
    let fetcher = fetcher(ScriptedSource::new(Behaviour::ClobberDir, Duration::ZERO), 1, parent.path());

    let err = fetcher
        .fetch(&FetchRequest::new("Song", "Artist", QualityTier::High))
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::Io(_)), "{err:?}");
    assert!(dir_is_empty(fetcher.temp_dir()));
    assert_eq!(fetcher.active_downloads(), 0);
}

#[tokio::test]
async fn test_source_error_propagates_and_releases_slot() {
    let parent = tempfile::tempdir().unwrap();
    let fetcher = fetcher(ScriptedSource::new(Behaviour::Fail, Duration::ZERO), 1, parent.path());

    for _ in 0..3 {
        let err = fetcher
            .fetch(&FetchRequest::new("Song", "Artist", QualityTier::High))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::NoMatch));
    }
    assert_eq!(fetcher.active_downloads(), 0);
}

#[tokio::test]
async fn test_empty_query_short_circuits() {
    let parent = tempfile::tempdir().unwrap();
    let source = ScriptedSource::new(Behaviour::Write, Duration::ZERO);
    let fetcher = fetcher(source.clone(), 1, parent.path());

    let err = fetcher
        .fetch(&FetchRequest::new("(Intro)", "[Various]", QualityTier::High))
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::NoMatch));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_temp_dir_prefix_and_cleanup_all() {
    let parent = tempfile::tempdir().unwrap();
    let source = ScriptedSource::new(Behaviour::Write, Duration::ZERO);
    let fetcher = fetcher(source, 2, parent.path());

    let dir_name = fetcher.temp_dir().file_name().unwrap().to_string_lossy().into_owned();
    assert!(dir_name.starts_with("music_bot_"), "{dir_name}");

    let a = fetcher.fetch(&FetchRequest::new("A", "X", QualityTier::High)).await.unwrap();
    let b = fetcher.fetch(&FetchRequest::new("B", "X", QualityTier::High)).await.unwrap();
    assert_eq!(fetcher.cleanup_all(), 2);
    assert!(!a.path().exists());
    assert!(!b.path().exists());
    // Dropping handles after cleanup is harmless
    drop(a);
    drop(b);
}

#[cfg(unix)]
mod ytdlp_script {
    use super::*;
    use flowcore::download::YtDlpSource;
    use serial_test::serial;
    use std::os::unix::fs::PermissionsExt;

    /// Writes an executable shell script that stands in for yt-dlp.
    fn fake_ytdlp(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-yt-dlp");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn script_fetcher(script: &Path, parent: &Path, timeout: Duration) -> AudioFetcher {
        AudioFetcher::with_config(
            Arc::new(YtDlpSource::with_binary(script.to_string_lossy())),
            FetcherConfig {
                max_concurrent: 1,
                timeout,
                temp_parent: Some(parent.to_path_buf()),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_ytdlp_writes_to_template() {
        let bin = tempfile::tempdir().unwrap();
        let parent = tempfile::tempdir().unwrap();
        // Find the value after -o and write an mp3 there
        let script = fake_ytdlp(
            bin.path(),
            r#"while [ "$#" -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; fi
  shift
done
target=$(printf '%s' "$out" | sed 's/%(ext)s/mp3/')
printf 'ID3' > "$target""#,
        );

        let fetcher = script_fetcher(&script, parent.path(), Duration::from_secs(10));
        let file = fetcher
            .fetch(&FetchRequest::new("Song", "Artist", QualityTier::High))
            .await
            .unwrap();
        assert!(file.file_name().ends_with(".mp3"));
        assert_eq!(file.size(), 3);
    }

    #[tokio::test]
    #[serial]
    async fn test_ytdlp_failure_is_classified() {
        let bin = tempfile::tempdir().unwrap();
        let parent = tempfile::tempdir().unwrap();
        let script = fake_ytdlp(
            bin.path(),
            "echo 'ERROR: [youtube] x: Private video' >&2\nexit 1",
        );

        let fetcher = script_fetcher(&script, parent.path(), Duration::from_secs(10));
        let err = fetcher
            .fetch(&FetchRequest::new("Song", "Artist", QualityTier::High))
            .await
            .unwrap_err();
        match err {
            DownloadError::YtDlp { kind, stderr } => {
                assert_eq!(kind, flowcore::download::ytdlp_errors::YtDlpErrorType::VideoUnavailable);
                assert!(stderr.contains("Private video"));
            }
            other => panic!("expected yt-dlp error, got {other:?}"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_ytdlp_timeout_kills_process() {
        let bin = tempfile::tempdir().unwrap();
        let parent = tempfile::tempdir().unwrap();
        let script = fake_ytdlp(bin.path(), "sleep 30");

        let fetcher = script_fetcher(&script, parent.path(), Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = fetcher
            .fetch(&FetchRequest::new("Song", "Artist", QualityTier::High))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Timeout(_)), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(dir_is_empty(fetcher.temp_dir()));
    }
}
