//! Telegram update handlers
//!
//! - `types`: handler dependencies and the handler error type
//! - `schema`: the dptree dispatcher schema
//! - `commands`, `links`, `callbacks`: the handlers themselves

pub mod callbacks;
pub mod commands;
pub mod links;
pub mod schema;
pub mod types;

pub use callbacks::{handle_callback_data, handle_callback_query};
pub use commands::{handle_demo_command, handle_help_command, handle_start_command};
pub use links::{handle_spotify_link, handle_text_message};
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
