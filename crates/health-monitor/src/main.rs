use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use health_monitor::{server, BotStatus, MonitorConfig, Supervisor};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = MonitorConfig::from_env();
    log::info!(
        "health-monitor: port={} bot_command={:?} poll={}s restart_delay={}s",
        cfg.port,
        cfg.bot_command,
        cfg.poll_interval.as_secs(),
        cfg.restart_delay.as_secs()
    );

    let status = Arc::new(RwLock::new(BotStatus::default()));
    let supervisor = Supervisor::new(
        cfg.bot_command.clone(),
        cfg.poll_interval,
        cfg.restart_delay,
        Arc::clone(&status),
    );

    tokio::spawn(async move {
        if let Err(e) = supervisor.run().await {
            log::error!("Supervisor stopped: {}", e);
        }
    });

    server::serve(cfg.port, status).await
}
