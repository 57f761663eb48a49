//! Inline-keyboard button presses

use teloxide::prelude::*;
use teloxide::types::MessageId;

use super::types::HandlerDeps;
use crate::telegram::callback::CallbackAction;
use crate::telegram::delivery::{deliver_collection, deliver_track, Collection};
use crate::telegram::keyboards;
use crate::telegram::markdown::{edit_markdown, send_markdown};
use crate::telegram::messages;
use crate::telegram::Bot;

/// Answers the query, then dispatches on its data.
pub async fn handle_callback_query(bot: &Bot, deps: &HandlerDeps, q: CallbackQuery) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query {:?}: {}", q.id, e);
    }

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        log::warn!("Callback '{}' arrived without a message", data);
        return Ok(());
    };

    handle_callback_data(bot, deps, message.chat().id, message.id(), data).await
}

/// `message_id` is the message carrying the pressed keyboard; it is edited in place.
pub async fn handle_callback_data(
    bot: &Bot,
    deps: &HandlerDeps,
    chat_id: ChatId,
    message_id: MessageId,
    data: &str,
) -> ResponseResult<()> {
    let Some(action) = CallbackAction::parse(data) else {
        log::warn!("Unknown callback data '{}' from chat {}", data, chat_id);
        send_markdown(bot, chat_id, messages::unknown_action(), None).await?;
        return Ok(());
    };

    log::debug!("Callback {:?} from chat {}", action, chat_id);

    match action {
        CallbackAction::MainMenu => {
            edit_markdown(bot, chat_id, message_id, messages::welcome(), Some(keyboards::main_keyboard())).await
        }
        CallbackAction::Help => {
            edit_markdown(bot, chat_id, message_id, messages::help(), Some(keyboards::help_keyboard())).await
        }
        CallbackAction::TryDemo => {
            edit_markdown(
                bot,
                chat_id,
                message_id,
                messages::demo_menu(),
                Some(keyboards::demo_menu_keyboard()),
            )
            .await
        }
        CallbackAction::GetDemoUrl => {
            let url = deps.demo.random_url();
            edit_markdown(
                bot,
                chat_id,
                message_id,
                messages::demo_link(url.as_deref()),
                Some(keyboards::demo_link_keyboard()),
            )
            .await
        }
        CallbackAction::ShareBot => {
            let keyboard = match deps.bot_username.as_deref().map(keyboards::share_keyboard) {
                Some(Ok(keyboard)) => keyboard,
                Some(Err(e)) => {
                    log::error!("Failed to build share link: {}", e);
                    keyboards::help_keyboard()
                }
                None => keyboards::help_keyboard(),
            };
            edit_markdown(bot, chat_id, message_id, messages::share(), Some(keyboard)).await
        }
        CallbackAction::Quality(quality) => match deps.sessions.take_track(chat_id) {
            Some(track) => {
                deliver_track(bot, &deps.fetcher, chat_id, message_id, &track, quality).await;
                Ok(())
            }
            None => edit_markdown(bot, chat_id, message_id, messages::session_expired(), None).await,
        },
        CallbackAction::DownloadCollection { kind, id, quality } => {
            let Some(metadata) = deps.sessions.take_collection(chat_id, kind, &id) else {
                log::info!("No pending {} {} for chat {}, ignoring", kind, id, chat_id);
                return Ok(());
            };
            if let Some(collection) = Collection::from_metadata(&metadata) {
                deliver_collection(bot, &deps.fetcher, chat_id, message_id, collection, quality).await;
            }
            Ok(())
        }
        CallbackAction::Cancel => {
            if deps.sessions.take(chat_id).is_some() {
                log::info!("Chat {} cancelled its pending download", chat_id);
            }
            edit_markdown(bot, chat_id, message_id, messages::cancelled(), None).await
        }
    }
}
