//! Process execution utilities with timeout support
//!
//! Used for yt-dlp invocations so a hung download cannot block a worker slot.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Outcome of a bounded process run that did not produce output.
#[derive(Debug)]
pub enum ProcessError {
    /// The process could not be spawned or awaited
    Io(std::io::Error),
    /// The process ran longer than the timeout and was killed
    TimedOut(Duration),
}

/// Run an async Command with a timeout.
///
/// The child is spawned with `kill_on_drop`, so when the timeout fires and the
/// output future is dropped the process is killed as well.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, ProcessError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ProcessError::Io(e)),
        Err(_) => Err(ProcessError::TimedOut(timeout)),
    }
}

/// Last `max_lines` non-empty lines of a process stream, for logging.
pub fn output_tail(bytes: &[u8], max_lines: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_with_timeout_collects_output() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo hello");
        let output = run_with_timeout(&mut cmd, Duration::from_secs(5)).await.unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_with_timeout_times_out() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 5");
        let result = run_with_timeout(&mut cmd, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(ProcessError::TimedOut(_))));
    }

    #[tokio::test]
    async fn test_run_with_timeout_missing_binary() {
        let mut cmd = Command::new("definitely-not-a-real-binary-4242");
        let result = run_with_timeout(&mut cmd, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ProcessError::Io(_))));
    }

    #[test]
    fn test_output_tail() {
        let text = b"one\n\ntwo\nthree\nfour\n";
        assert_eq!(output_tail(text, 2), "three\nfour");
        assert_eq!(output_tail(b"", 3), "");
    }
}
