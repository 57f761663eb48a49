//! Inline keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use flowcore::{EntityKind, QualityTier};

use super::callback::CallbackAction;
use super::messages::share_text;

fn button(label: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.data())
}

fn back_row() -> Vec<InlineKeyboardButton> {
    vec![button("🏠 Back to Main Menu", CallbackAction::MainMenu)]
}

fn cancel_row() -> Vec<InlineKeyboardButton> {
    vec![button("🚫 Cancel", CallbackAction::Cancel)]
}

pub fn main_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("🎪 Try Demo", CallbackAction::TryDemo),
            button("💡 Help", CallbackAction::Help),
        ],
        vec![button("🚀 Share Bot", CallbackAction::ShareBot)],
    ])
}

pub fn help_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![back_row()])
}

/// Single "Try Demo" button attached to the not-a-link reply.
pub fn try_demo_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🎪 Try Demo", CallbackAction::TryDemo)]])
}

pub fn demo_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("🎲 Get Random Demo URL", CallbackAction::GetDemoUrl)],
        back_row(),
    ])
}

pub fn demo_link_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("🎲 Another Demo URL", CallbackAction::GetDemoUrl)],
        back_row(),
    ])
}

/// `https://t.me/share/url` link that pre-fills a message pointing at the bot.
pub fn share_url(bot_username: &str) -> Result<Url, url::ParseError> {
    let bot_link = format!("https://t.me/{}", bot_username);
    Url::parse(&format!(
        "https://t.me/share/url?url={}&text={}",
        urlencoding::encode(&bot_link),
        urlencoding::encode(&share_text(bot_username))
    ))
}

pub fn share_keyboard(bot_username: &str) -> Result<InlineKeyboardMarkup, url::ParseError> {
    Ok(InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::url("📤 Share with Friends", share_url(bot_username)?)],
        back_row(),
    ]))
}

/// Quality tiers in rows of two, then Cancel.
pub fn track_quality_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = QualityTier::ALL
        .chunks(2)
        .map(|chunk| {
            chunk
                .iter()
                .map(|q| button(q.label(), CallbackAction::Quality(*q)))
                .collect()
        })
        .collect();
    rows.push(cancel_row());
    InlineKeyboardMarkup::new(rows)
}

/// One tier per row for a playlist or album, then Cancel.
pub fn collection_quality_keyboard(kind: EntityKind, id: &str) -> InlineKeyboardMarkup {
    let prefix = match kind {
        EntityKind::Album => "💿",
        EntityKind::Playlist | EntityKind::Track => "📥",
    };
    let mut rows: Vec<Vec<InlineKeyboardButton>> = QualityTier::ALL
        .iter()
        .map(|q| {
            vec![button(
                &format!("{} {}", prefix, q.label()),
                CallbackAction::DownloadCollection {
                    kind,
                    id: id.to_string(),
                    quality: *q,
                },
            )]
        })
        .collect();
    rows.push(cancel_row());
    InlineKeyboardMarkup::new(rows)
}
