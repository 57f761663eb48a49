//! Bot process supervisor
//!
//! Starts the bot, polls it, and restarts it after a crash. A clean exit
//! (status 0) ends supervision; the HTTP server keeps answering.

use std::collections::VecDeque;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Lines of bot stderr kept for the crash report
pub const STDERR_TAIL_LINES: usize = 20;

/// Liveness as reported by the web server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BotStatus {
    pub running: bool,
    /// Unix seconds of the last poll that found the bot alive
    pub last_seen: Option<f64>,
    pub restarts: u32,
    pub last_exit_code: Option<i32>,
    /// Set once the bot exited cleanly and will not be restarted
    pub stopped: bool,
}

pub type SharedStatus = Arc<RwLock<BotStatus>>;

pub fn unix_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// How one bot run ended.
#[derive(Debug)]
enum RunOutcome {
    Exited(ExitStatus),
    SpawnFailed(std::io::Error),
    WaitFailed(std::io::Error),
}

pub struct Supervisor {
    command: Vec<String>,
    poll_interval: Duration,
    restart_delay: Duration,
    status: SharedStatus,
}

impl Supervisor {
    pub fn new(command: Vec<String>, poll_interval: Duration, restart_delay: Duration, status: SharedStatus) -> Self {
        Self {
            command,
            poll_interval,
            restart_delay,
            status,
        }
    }

    pub fn status(&self) -> SharedStatus {
        Arc::clone(&self.status)
    }

    /// Supervises until the bot exits with status 0.
    pub async fn run(self) -> anyhow::Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            anyhow::bail!("bot command is empty");
        };

        loop {
            log::info!("Starting bot: {}", self.command.join(" "));
            let outcome = self.run_once(program, args).await;

            {
                let mut status = self.status.write().await;
                status.running = false;
                if let RunOutcome::Exited(exit) = &outcome {
                    status.last_exit_code = exit.code();
                }
            }

            match outcome {
                RunOutcome::Exited(exit) if exit.success() => {
                    log::info!("Bot exited normally, supervisor stopping");
                    self.status.write().await.stopped = true;
                    return Ok(());
                }
                RunOutcome::Exited(exit) => {
                    log::error!("Bot exited with {}", exit);
                }
                RunOutcome::SpawnFailed(e) => {
                    log::error!("Failed to start bot '{}': {}", program, e);
                }
                RunOutcome::WaitFailed(e) => {
                    log::error!("Lost track of bot process: {}", e);
                }
            }

            let restarts = {
                let mut status = self.status.write().await;
                status.restarts += 1;
                status.restarts
            };
            log::warn!(
                "Restarting bot in {}s (restart #{})",
                self.restart_delay.as_secs_f64(),
                restarts
            );
            tokio::time::sleep(self.restart_delay).await;
        }
    }

    async fn run_once(&self, program: &str, args: &[String]) -> RunOutcome {
        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return RunOutcome::SpawnFailed(e),
        };

        let stderr_tail = child.stderr.take().map(collect_stderr_tail);
        let outcome = self.poll_until_exit(&mut child).await;

        if let Some(handle) = stderr_tail {
            match handle.await {
                Ok(tail) if !tail.is_empty() && !matches!(&outcome, RunOutcome::Exited(e) if e.success()) => {
                    log::error!("Last bot stderr lines:\n{}", Vec::from(tail).join("\n"));
                }
                Ok(_) => {}
                Err(e) => log::warn!("stderr reader failed: {}", e),
            }
        }
        outcome
    }

    async fn poll_until_exit(&self, child: &mut Child) -> RunOutcome {
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            match child.try_wait() {
                Ok(None) => {
                    let mut status = self.status.write().await;
                    status.running = true;
                    status.last_seen = Some(unix_now());
                }
                Ok(Some(exit)) => return RunOutcome::Exited(exit),
                Err(e) => return RunOutcome::WaitFailed(e),
            }
            ticker.tick().await;
        }
    }
}

/// Echoes the bot's stderr through our logger and keeps the last lines.
fn collect_stderr_tail(stderr: ChildStderr) -> JoinHandle<VecDeque<String>> {
    tokio::spawn(async move {
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            log::info!(target: "bot", "{}", line);
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        tail
    })
}
