//! Plain-text messages: Spotify links start the download flow

use teloxide::prelude::*;

use flowcore::spotify::{is_spotify_link, LinkError};
use flowcore::{parse_link, Metadata, MetadataError};

use super::types::HandlerDeps;
use crate::telegram::keyboards;
use crate::telegram::markdown::{edit_markdown, send_markdown};
use crate::telegram::messages;
use crate::telegram::session::Session;
use crate::telegram::Bot;

/// Routes a non-command text message.
pub async fn handle_text_message(bot: &Bot, deps: &HandlerDeps, chat_id: ChatId, text: &str) -> ResponseResult<()> {
    let text = text.trim();
    if is_spotify_link(text) {
        handle_spotify_link(bot, deps, chat_id, text).await
    } else {
        send_markdown(bot, chat_id, messages::not_a_link(), Some(keyboards::try_demo_keyboard())).await?;
        Ok(())
    }
}

/// Resolves the link and offers a quality choice, remembering the metadata
/// in the chat's session.
pub async fn handle_spotify_link(bot: &Bot, deps: &HandlerDeps, chat_id: ChatId, url: &str) -> ResponseResult<()> {
    let status = send_markdown(bot, chat_id, messages::analyzing(), None).await?;

    let link = match parse_link(url) {
        Ok(link) => link,
        Err(e) => {
            log::info!("Rejected link from chat {}: {}", chat_id, e);
            let text = match e {
                LinkError::UnsupportedKind(_) => messages::unsupported_link(),
                LinkError::Unrecognized => messages::invalid_link(),
            };
            return edit_markdown(bot, chat_id, status.id, text, None).await;
        }
    };

    let metadata = match deps.spotify.resolve(&link).await {
        Ok(metadata) => metadata,
        Err(MetadataError::NotFound) => {
            log::info!("{} {} not found (chat {})", link.kind, link.id, chat_id);
            return edit_markdown(bot, chat_id, status.id, messages::not_found(link.kind), None).await;
        }
        Err(e) => {
            log::error!(
                "Failed to resolve {} {} [{}]: {}",
                link.kind,
                link.id,
                e.subcategory(),
                e
            );
            return edit_markdown(bot, chat_id, status.id, messages::retrieval_error(link.kind), None).await;
        }
    };

    let (text, keyboard) = match &metadata {
        Metadata::Track(track) => (messages::track_found(track), keyboards::track_quality_keyboard()),
        Metadata::Playlist(playlist) => (
            messages::playlist_found(playlist),
            keyboards::collection_quality_keyboard(link.kind, &playlist.id),
        ),
        Metadata::Album(album) => (
            messages::album_found(album),
            keyboards::collection_quality_keyboard(link.kind, &album.id),
        ),
    };

    log::info!(
        "Resolved {} '{}' ({} tracks) for chat {}",
        link.kind,
        metadata.name(),
        metadata.tracks().len(),
        chat_id
    );
    if deps.sessions.insert(chat_id, Session::new(url, metadata)).is_some() {
        log::debug!("Replaced pending session for chat {}", chat_id);
    }

    edit_markdown(bot, chat_id, status.id, text, Some(keyboard)).await
}
