use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BOT_COMMAND: &str = "musicflow";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_RESTART_DELAY_SECS: u64 = 10;

/// Health monitor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// HTTP port, bound on all interfaces
    pub port: u16,
    /// Program followed by its arguments
    pub bot_command: Vec<String>,
    pub poll_interval: Duration,
    /// Pause before restarting a crashed bot
    pub restart_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bot_command: vec![DEFAULT_BOT_COMMAND.to_string()],
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            restart_delay: Duration::from_secs(DEFAULT_RESTART_DELAY_SECS),
        }
    }
}

impl MonitorConfig {
    /// Reads PORT, BOT_COMMAND, POLL_INTERVAL_SECS and RESTART_DELAY_SECS.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Unset, empty or
    /// unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .filter(|p| *p != 0)
            .unwrap_or(defaults.port);

        let bot_command = lookup("BOT_COMMAND")
            .map(|v| v.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty())
            .unwrap_or(defaults.bot_command);

        let secs = |name: &str, default: Duration| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            port,
            bot_command,
            poll_interval: secs("POLL_INTERVAL_SECS", defaults.poll_interval),
            restart_delay: secs("RESTART_DELAY_SECS", defaults.restart_delay),
        }
    }
}
