use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};

use super::Bot;

/// Send a pre-rendered MarkdownV2 message.
pub async fn send_markdown(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<Message> {
    let mut req = bot.send_message(chat_id, text.into()).parse_mode(ParseMode::MarkdownV2);
    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }
    req.await
}

/// Edit a message with pre-rendered MarkdownV2 text.
///
/// Telegram's "message is not modified" answer is not an error here: the
/// same status can legitimately be rendered twice in a row.
pub async fn edit_markdown(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: impl Into<String>,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<()> {
    let mut req = bot
        .edit_message_text(chat_id, message_id, text.into())
        .parse_mode(ParseMode::MarkdownV2);
    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }
    match req.await {
        Ok(_) => Ok(()),
        Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Like [`edit_markdown`], but only logs failures. Used for progress updates
/// that must not abort the download they report on.
pub async fn edit_markdown_logged(bot: &Bot, chat_id: ChatId, message_id: MessageId, text: impl Into<String>) {
    if let Err(e) = edit_markdown(bot, chat_id, message_id, text, None).await {
        log::warn!("Failed to update status message {} in chat {}: {}", message_id.0, chat_id, e);
    }
}
