//! Fetch-and-upload pipeline for single tracks and whole playlists/albums.
//!
//! Every [`DownloadedFile`](flowcore::DownloadedFile) is dropped right after
//! its `sendAudio` call returns, which deletes it from disk whether the
//! upload succeeded or not.

use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode};
use teloxide::RequestError;

use flowcore::core::utils::format_file_size;
use flowcore::spotify::TrackInfo;
use flowcore::{AudioFetcher, DownloadError, EntityKind, FetchRequest, Metadata, QualityTier};

use super::markdown::edit_markdown_logged;
use super::messages;
use super::Bot;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error("upload failed: {0}")]
    Upload(#[from] RequestError),
}

impl DeliveryError {
    pub fn user_message(&self) -> String {
        match self {
            DeliveryError::Download(e) => e.user_message(),
            DeliveryError::Upload(_) => "Telegram did not accept the audio file.".to_string(),
        }
    }
}

/// A playlist or album to deliver track by track.
#[derive(Debug, Clone, Copy)]
pub struct Collection<'a> {
    pub kind: EntityKind,
    pub name: &'a str,
    pub tracks: &'a [TrackInfo],
}

impl<'a> Collection<'a> {
    /// `None` for single tracks.
    pub fn from_metadata(metadata: &'a Metadata) -> Option<Self> {
        match metadata {
            Metadata::Track(_) => None,
            Metadata::Playlist(p) => Some(Self {
                kind: EntityKind::Playlist,
                name: &p.name,
                tracks: &p.tracks,
            }),
            Metadata::Album(a) => Some(Self {
                kind: EntityKind::Album,
                name: &a.name,
                tracks: &a.tracks,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub total: usize,
}

/// Downloads one track and uploads it to the chat.
pub async fn fetch_and_send(
    bot: &Bot,
    fetcher: &AudioFetcher,
    chat_id: ChatId,
    track: &TrackInfo,
    quality: QualityTier,
    caption: String,
) -> Result<(), DeliveryError> {
    let request = FetchRequest::new(track.name.clone(), track.artist.clone(), quality);
    let file = fetcher.fetch(&request).await?;

    log::info!(
        "Uploading {} ({}) to chat {}",
        file.file_name(),
        format_file_size(file.size()),
        chat_id
    );

    let result = bot
        .send_audio(chat_id, InputFile::file(file.path().to_path_buf()))
        .title(track.name.clone())
        .performer(track.artist.clone())
        .duration(track.duration_secs())
        .caption(caption)
        .parse_mode(ParseMode::MarkdownV2)
        .await;
    drop(file);

    result?;
    Ok(())
}

/// Single-track flow. `status` is the message that showed the quality keyboard.
pub async fn deliver_track(
    bot: &Bot,
    fetcher: &AudioFetcher,
    chat_id: ChatId,
    status: MessageId,
    track: &TrackInfo,
    quality: QualityTier,
) -> bool {
    edit_markdown_logged(bot, chat_id, status, messages::downloading(track, quality)).await;

    match fetch_and_send(bot, fetcher, chat_id, track, quality, messages::track_caption(track)).await {
        Ok(()) => {
            log::info!("Delivered '{}' by {} to chat {}", track.name, track.artist, chat_id);
            edit_markdown_logged(bot, chat_id, status, messages::download_complete(track)).await;
            true
        }
        Err(e) => {
            log::error!("Delivery of '{}' to chat {} failed: {}", track.name, chat_id, e);
            edit_markdown_logged(bot, chat_id, status, messages::download_failed(track, &e.user_message())).await;
            false
        }
    }
}

/// Sequential playlist/album flow with a progress message before every track.
/// Failed tracks are logged and skipped.
pub async fn deliver_collection(
    bot: &Bot,
    fetcher: &AudioFetcher,
    chat_id: ChatId,
    status: MessageId,
    collection: Collection<'_>,
    quality: QualityTier,
) -> DeliveryReport {
    let total = collection.tracks.len();
    let mut report = DeliveryReport { delivered: 0, total };

    if total == 0 {
        edit_markdown_logged(
            bot,
            chat_id,
            status,
            messages::empty_collection(collection.kind, collection.name),
        )
        .await;
        return report;
    }

    edit_markdown_logged(
        bot,
        chat_id,
        status,
        messages::collection_started(collection.kind, collection.name, total, quality),
    )
    .await;

    for (i, track) in collection.tracks.iter().enumerate() {
        let index = i + 1;
        edit_markdown_logged(
            bot,
            chat_id,
            status,
            messages::collection_progress(collection.kind, collection.name, index, total, track),
        )
        .await;

        let caption = messages::collection_caption(track, collection.kind, collection.name);
        match fetch_and_send(bot, fetcher, chat_id, track, quality, caption).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                log::warn!(
                    "Skipping '{}' ({}/{}) of {} '{}': {}",
                    track.name,
                    index,
                    total,
                    collection.kind,
                    collection.name,
                    e
                );
            }
        }
    }

    log::info!(
        "Finished {} '{}' for chat {}: {}/{} delivered",
        collection.kind,
        collection.name,
        chat_id,
        report.delivered,
        total
    );
    edit_markdown_logged(
        bot,
        chat_id,
        status,
        messages::collection_finished(collection.kind, collection.name, report.delivered, total),
    )
    .await;

    report
}
