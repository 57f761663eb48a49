//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::callbacks::handle_callback_query;
use super::commands::{handle_demo_command, handle_help_command, handle_start_command};
use super::links::handle_text_message;
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::Bot;

/// Creates the dispatcher schema for the bot.
///
/// Commands are tried first, then any other text message, then callback
/// queries from inline keyboards.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler())
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);

            match cmd {
                Command::Start => {
                    handle_start_command(&bot, msg.chat.id).await?;
                }
                Command::Help => {
                    handle_help_command(&bot, msg.chat.id).await?;
                }
                Command::Demo => {
                    handle_demo_command(&bot, msg.chat.id).await?;
                }
            }
            Ok(())
        },
    ))
}

/// Handler for every other text message (links and stray text)
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default();
                if let Err(e) = handle_text_message(&bot, &deps, msg.chat.id, text).await {
                    log::error!("Failed to handle message from chat {}: {}", msg.chat.id, e);
                    return Err(Box::new(e) as HandlerError);
                }
                Ok(())
            }
        })
}

/// Handler for callback queries (inline keyboard buttons)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            match handle_callback_query(&bot, &deps, q).await {
                Ok(()) => Ok(()),
                Err(e) => Err(Box::new(e) as HandlerError),
            }
        }
    })
}
