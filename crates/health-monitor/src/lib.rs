//! health-monitor - keeps the MusicFlow bot alive on hosts that expect a
//! web process.
//!
//! - `config`: environment settings
//! - `supervisor`: starts, polls and restarts the bot process
//! - `server`: the `/` and `/health` endpoints

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod server;
pub mod supervisor;

pub use config::MonitorConfig;
pub use supervisor::{BotStatus, SharedStatus, Supervisor};
