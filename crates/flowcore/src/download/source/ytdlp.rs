use async_trait::async_trait;
use tokio::process::Command;

use super::{AudioSource, SourceRequest};
use crate::core::config;
use crate::core::process::{output_tail, run_with_timeout, ProcessError};
use crate::download::error::DownloadError;
use crate::download::ytdlp_errors::{analyze_ytdlp_error, YtDlpErrorType};

/// yt-dlp backed source: `ytsearch1:<query>` against YouTube.
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    binary: String,
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpSource {
    /// Uses the binary from `YTDL_BIN`.
    pub fn new() -> Self {
        Self::with_binary(config::YTDL_BIN.as_str())
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Command-line arguments for one request.
    pub fn build_args(request: &SourceRequest) -> Vec<String> {
        let socket_timeout = config::download::SOCKET_TIMEOUT_SECS.to_string();
        let retries = config::download::RETRIES.to_string();

        let mut args = vec![
            format!("ytsearch1:{}", request.query),
            "-f".to_string(),
            request.quality.format_selector().to_string(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            request.output_template.to_string_lossy().into_owned(),
        ];
        args.extend(
            [
                "--socket-timeout",
                socket_timeout.as_str(),
                "--retries",
                retries.as_str(),
                "--fragment-retries",
                retries.as_str(),
                "--http-chunk-size",
                config::download::HTTP_CHUNK_SIZE,
                "--quiet",
                "--no-warnings",
                "--no-write-thumbnail",
                "--no-write-subs",
                "--no-write-info-json",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args
    }
}

#[async_trait]
impl AudioSource for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<(), DownloadError> {
        let args = Self::build_args(request);
        log::info!("Running {} for query: {}", self.binary, request.query);
        log::debug!("{} {}", self.binary, args.join(" "));

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args);

        let output = match run_with_timeout(&mut cmd, request.timeout).await {
            Ok(output) => output,
            Err(ProcessError::TimedOut(timeout)) => {
                log::warn!("yt-dlp timed out after {}s for query: {}", timeout.as_secs(), request.query);
                return Err(DownloadError::Timeout(timeout.as_secs()));
            }
            Err(ProcessError::Io(e)) => {
                log::error!("Failed to start {}: {}", self.binary, e);
                return Err(DownloadError::Process(format!("{}: {}", self.binary, e)));
            }
        };

        if output.status.success() {
            return Ok(());
        }

        let stderr = output_tail(&output.stderr, 10);
        let kind = analyze_ytdlp_error(&stderr);
        log::error!(
            "yt-dlp exited with {} ({}) for query '{}': {}",
            output.status,
            kind.as_str(),
            request.query,
            stderr
        );

        if kind == YtDlpErrorType::NoResults {
            return Err(DownloadError::NoMatch);
        }
        Err(DownloadError::YtDlp { kind, stderr })
    }
}
