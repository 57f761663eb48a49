//! Telegram side of the bot: dispatcher schema, keyboards, texts and the
//! download delivery flow.

pub mod bot;
pub mod callback;
pub mod delivery;
pub mod handlers;
pub mod keyboards;
pub mod markdown;
pub mod messages;
pub mod session;

pub type Bot = teloxide::Bot;

pub use bot::{create_bot, is_retryable_startup_error, run_with_restarts, setup_bot_commands, Command};
pub use callback::CallbackAction;
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use session::{Session, SessionStore};
