//! flowbot - the Telegram half of MusicFlow
//!
//! # Module Structure
//!
//! - `telegram`: dispatcher schema, handlers, keyboards and delivery
//! - `tools`: the `resolve` and `fetch` CLI subcommands
//! - `cli`: command-line arguments

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod telegram;
pub mod tools;

pub use telegram::{schema, HandlerDeps};
