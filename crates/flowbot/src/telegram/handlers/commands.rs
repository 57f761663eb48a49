//! `/start`, `/help` and `/demo`

use teloxide::prelude::*;

use crate::telegram::keyboards;
use crate::telegram::markdown::send_markdown;
use crate::telegram::messages;
use crate::telegram::Bot;

pub async fn handle_start_command(bot: &Bot, chat_id: ChatId) -> ResponseResult<Message> {
    send_markdown(bot, chat_id, messages::welcome(), Some(keyboards::main_keyboard())).await
}

pub async fn handle_help_command(bot: &Bot, chat_id: ChatId) -> ResponseResult<Message> {
    send_markdown(bot, chat_id, messages::help(), Some(keyboards::help_keyboard())).await
}

pub async fn handle_demo_command(bot: &Bot, chat_id: ChatId) -> ResponseResult<Message> {
    send_markdown(bot, chat_id, messages::demo_menu(), Some(keyboards::demo_menu_keyboard())).await
}
