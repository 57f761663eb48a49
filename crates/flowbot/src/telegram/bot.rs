//! Bot construction and command registration

use std::future::Future;
use std::time::Duration;

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use flowcore::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "MusicFlow commands:")]
pub enum Command {
    #[command(description = "show the main menu")]
    Start,
    #[command(description = "how to use the bot")]
    Help,
    #[command(description = "get a demo track link")]
    Demo,
}

/// Creates a Bot instance with the given token, honouring `BOT_API_URL`.
///
/// # Errors
/// Fails when the HTTP client cannot be built or `BOT_API_URL` is not a valid URL.
pub fn create_bot(token: &str) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::bot_api_timeout()).build()?;
    let bot = Bot::with_client(token, client);

    let bot = match config::BOT_API_URL.as_deref() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Whether a `get_me` failure at startup is worth retrying (local Bot API
/// server still booting, transient network trouble).
pub fn is_retryable_startup_error(err: &str) -> bool {
    let err = err.to_lowercase();
    ["restart", "network", "connection", "timed out", "connection refused"]
        .iter()
        .any(|needle| err.contains(needle))
}

/// Command list shown in the Telegram UI.
pub fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "show the main menu"),
        BotCommand::new("help", "how to use the bot"),
        BotCommand::new("demo", "get a demo track link"),
    ]
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(bot_commands()).await?;
    Ok(())
}

/// Runs `run` in its own task, restarting it with exponential backoff
/// (`base_delay * 2^(n-1)`) each time it panics.
///
/// Returns `Ok` when the task finishes on its own and an error once it has
/// panicked more than `max_retries` times, so the process exits non-zero and
/// its supervisor restarts it.
pub async fn run_with_restarts<F, Fut>(max_retries: u32, base_delay: Duration, mut run: F) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut retry_count = 0;

    loop {
        // A separate task isolates panics; they surface through the JoinHandle
        match tokio::spawn(run()).await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                return Ok(());
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);
                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    anyhow::bail!("dispatcher panicked {} times, giving up", retry_count + 1);
                }
                retry_count += 1;
                log::info!(
                    "Restarting dispatcher after panic (attempt {}/{})...",
                    retry_count,
                    max_retries
                );
                let delay = base_delay * 2u32.saturating_pow(retry_count - 1);
                tokio::time::sleep(delay).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                return Ok(());
            }
        }
    }
}
