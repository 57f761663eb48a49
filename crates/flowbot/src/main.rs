use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use tokio::time::sleep;

use flowbot::cli::{Cli, Commands};
use flowbot::telegram::{
    create_bot, is_retryable_startup_error, run_with_restarts, schema, setup_bot_commands, Bot, HandlerDeps,
};
use flowbot::tools;
use flowcore::config::{self, RequiredSecrets};
use flowcore::core::{init_logger, log_startup_configuration};
use flowcore::DemoSongs;

/// Main entry point for the bot
///
/// # Errors
/// Returns an error if initialization fails (logging, missing secrets, Bot API unreachable).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // .env first so LOG_FILE_PATH can come from it
    let _ = dotenv();
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Resolve { url, json }) => tools::run_resolve(&url, json).await,
        Some(Commands::Fetch { url, quality, output }) => tools::run_fetch(&url, &quality, &output).await,
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting MusicFlow bot...");
    log_startup_configuration();

    let secrets = RequiredSecrets::from_env()?;
    let bot = create_bot(&secrets.bot_token)?;

    // Retry while a local Bot API server is still coming up
    let bot_info = {
        let startup_max_retries = config::retry::STARTUP_MAX_RETRIES;
        let mut startup_retry = 0;
        loop {
            match bot.get_me().await {
                Ok(info) => break info,
                Err(e) => {
                    let err_str = e.to_string();
                    startup_retry += 1;
                    if startup_retry >= startup_max_retries || !is_retryable_startup_error(&err_str) {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} attempts: {}",
                            startup_retry,
                            e
                        ));
                    }
                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying in 5 seconds...",
                        startup_retry,
                        startup_max_retries,
                        err_str
                    );
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }
    };
    let bot_username = bot_info.username.clone();
    log::info!("Bot username: {:?}, Bot ID: {}", bot_username, bot_info.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let spotify = Arc::new(tools::spotify_client_from_env()?);
    let fetcher = Arc::new(tools::fetcher_from_env()?);
    log::info!(
        "Audio fetcher ready: {} concurrent downloads, scratch dir {}",
        fetcher.max_concurrent(),
        fetcher.temp_dir().display()
    );

    let deps = HandlerDeps::new(spotify, Arc::clone(&fetcher), Arc::new(DemoSongs::new()), bot_username);

    let outcome = run_dispatcher(bot, deps).await;

    let removed = fetcher.cleanup_all();
    if removed > 0 {
        log::info!("Removed {} leftover temporary file(s)", removed);
    }
    // A non-zero exit tells the health monitor to restart the bot
    outcome?;
    log::info!("Bot stopped");
    Ok(())
}

/// Runs the dispatcher, restarting it with exponential backoff if it panics.
async fn run_dispatcher(bot: Bot, deps: HandlerDeps) -> Result<()> {
    let handler = schema(deps);

    run_with_restarts(
        config::retry::MAX_DISPATCHER_RETRIES,
        config::retry::dispatcher_delay(),
        move || {
            let bot = bot.clone();
            let handler = handler.clone();
            async move {
                use teloxide::update_listeners::Polling;

                let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

                Dispatcher::builder(bot, handler)
                    .dependencies(DependencyMap::new())
                    .enable_ctrlc_handler()
                    .build()
                    .dispatch_with_listener(
                        listener,
                        LoggingErrorHandler::with_custom_text("An error from the update listener"),
                    )
                    .await
            }
        },
    )
    .await
}
