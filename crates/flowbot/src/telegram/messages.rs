//! Chat texts, rendered as MarkdownV2.
//!
//! Every dynamic value goes through [`escape_markdown_v2`] so track and
//! playlist names with `.`, `-`, `(` and friends never break entity parsing.

use flowcore::core::utils::{create_progress_bar, escape_markdown_v2, truncate_text};
use flowcore::spotify::{AlbumInfo, PlaylistInfo, TrackInfo};
use flowcore::{EntityKind, QualityTier};

/// Telegram rejects captions longer than 1024 characters.
const MAX_NAME_IN_CAPTION: usize = 200;

fn text(s: &str) -> String {
    escape_markdown_v2(s)
}

fn bold(s: &str) -> String {
    format!("*{}*", escape_markdown_v2(s))
}

fn italic(s: &str) -> String {
    format!("_{}_", escape_markdown_v2(s))
}

fn code(s: &str) -> String {
    format!("`{}`", s.replace('\\', "\\\\").replace('`', "\\`"))
}

fn lines(parts: &[String]) -> String {
    parts.join("\n")
}

fn collection_icon(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Album => "💽",
        EntityKind::Playlist | EntityKind::Track => "🎧",
    }
}

pub fn welcome() -> String {
    lines(&[
        format!("🎵 {} 🎵", bold("Welcome to MusicFlow Bot!")),
        String::new(),
        text("Your personal music companion for seamless downloads! ✨"),
        String::new(),
        format!("🌟 {}", bold("What I can do for you:")),
        text("• 🎶 Download individual tracks instantly"),
        text("• 🎧 Process entire playlists and albums effortlessly"),
        text("• 🎯 Multiple quality options available"),
        text("• ⚡ Lightning-fast processing"),
        text("• 🎪 Try demo tracks to test functionality"),
        String::new(),
        text("Simply share any Spotify link and let the magic happen! 🪄"),
        String::new(),
        format!("{} {}", bold("Ready to get started?"), text("Choose an option below! 👇")),
    ])
}

pub fn help() -> String {
    lines(&[
        format!("🎯 {}", bold("How to use MusicFlow Bot:")),
        String::new(),
        format!("1️⃣ {}", bold("For Single Tracks:")),
        text("   • Share a Spotify track link"),
        text("   • Choose your preferred quality"),
        text("   • Download starts automatically!"),
        String::new(),
        format!("2️⃣ {}", bold("For Playlists and Albums:")),
        text("   • Share a playlist or album link"),
        text("   • I'll process all tracks for you"),
        text("   • Sit back and enjoy! ☕"),
        String::new(),
        format!("3️⃣ {}", bold("Quality Options:")),
        text(&format!("   • {} - Good quality, smaller size", QualityTier::Standard.label())),
        text(&format!("   • {} - Better quality, balanced", QualityTier::High.label())),
        text(&format!("   • {} - Best quality, larger size", QualityTier::Premium.label())),
        String::new(),
        format!("💡 {}", bold("Pro Tips:")),
        text("• Processing time varies by content length"),
        text("• Playlists are processed sequentially"),
        text("• Use /start to return to main menu, /demo for a test link"),
        String::new(),
        text("Need more help? Just ask! 😊"),
    ])
}

pub fn not_a_link() -> String {
    lines(&[
        format!("🤔 {}", bold("Hmm, that doesn't look like a valid music link!")),
        String::new(),
        text("Please share a proper Spotify link, or try our demo feature! 🎶"),
    ])
}

pub fn analyzing() -> String {
    lines(&[
        format!("🔍 {}", bold("Analyzing your request...")),
        String::new(),
        text("⏳ Please wait while I prepare everything for you! ✨"),
    ])
}

pub fn unsupported_link() -> String {
    lines(&[
        format!("🚫 {}", bold("Oops! Unsupported link type.")),
        String::new(),
        text("Please share a track, playlist, or album link! 🎶"),
    ])
}

pub fn invalid_link() -> String {
    lines(&[
        format!("🚫 {}", bold("Something went wrong!")),
        String::new(),
        text("Please check your link and try again. 🔄"),
    ])
}

pub fn not_found(kind: EntityKind) -> String {
    lines(&[
        format!("🚫 {}", bold(&format!("{} not found!", kind.display_name()))),
        String::new(),
        text("Please check your link and try again. 🔄"),
    ])
}

pub fn retrieval_error(kind: EntityKind) -> String {
    lines(&[
        format!("🚫 {}", bold(&format!("Error retrieving {} information.", kind.as_str()))),
        String::new(),
        text("Please try again later! 🔄"),
    ])
}

pub fn track_found(track: &TrackInfo) -> String {
    lines(&[
        format!("🎶 {}", bold("Found your track!")),
        String::new(),
        format!("🎤 {}", bold(&track.name)),
        format!("👨‍🎤 {}", italic(&format!("by {}", track.artist))),
        format!("⏱️ {}", italic(&format!("Duration: {}", track.duration))),
        String::new(),
        format!("🎯 {}", bold("Choose your preferred quality:")),
    ])
}

fn collection_found(kind: EntityKind, name: &str, by: &str, count: usize) -> String {
    let heading = match kind {
        EntityKind::Album => "Album Found!",
        EntityKind::Playlist | EntityKind::Track => "Playlist Found!",
    };
    lines(&[
        format!("{} {}", collection_icon(kind), bold(heading)),
        String::new(),
        format!("🎼 {}", bold(name)),
        format!("👨‍🎤 {}", italic(&format!("by {}", by))),
        format!("🎶 {}", italic(&format!("{} tracks", count))),
        String::new(),
        format!("🎯 {}", bold(&format!("Choose quality to download all {} tracks:", count))),
    ])
}

pub fn playlist_found(playlist: &PlaylistInfo) -> String {
    collection_found(EntityKind::Playlist, &playlist.name, &playlist.owner, playlist.tracks.len())
}

pub fn album_found(album: &AlbumInfo) -> String {
    collection_found(EntityKind::Album, &album.name, &album.artist, album.tracks.len())
}

pub fn empty_collection(kind: EntityKind, name: &str) -> String {
    lines(&[
        format!("{} {}", collection_icon(kind), bold(name)),
        String::new(),
        text(&format!("This {} has no downloadable tracks. 🤷", kind.as_str())),
    ])
}

pub fn demo_menu() -> String {
    lines(&[
        format!("🎪 {}", bold("Demo Mode")),
        String::new(),
        text("Test the bot with popular tracks! 🎶"),
        String::new(),
        text("Click below to get a random demo link that you can copy and test! ✨"),
    ])
}

pub fn demo_link(url: Option<&str>) -> String {
    match url {
        Some(url) => lines(&[
            format!("🎯 {}", bold("Here's your demo link!")),
            String::new(),
            code(url),
            String::new(),
            format!(
                "📋 {} ✨",
                bold("Tap to copy the link above, then send it back to me to test the download!")
            ),
            String::new(),
            text("🔄 Want another demo link?"),
        ]),
        None => lines(&[
            format!("🎪 {}", bold("No demo tracks available right now.")),
            String::new(),
            text("Share your own Spotify link instead! 🎶"),
        ]),
    }
}

pub fn share() -> String {
    lines(&[
        format!("📢 {}", bold("Share MusicFlow Bot!")),
        String::new(),
        text("Help your friends discover seamless music downloads! 🎶✨"),
        String::new(),
        text("Click the button below to share:"),
    ])
}

/// Plain text; sent without a parse mode.
pub fn share_text(bot_username: &str) -> String {
    format!("🎶 Check out this amazing MusicFlow Bot! @{} 🎶", bot_username)
}

pub fn session_expired() -> String {
    text("❌ Session expired. Please send the link again!")
}

pub fn unknown_action() -> String {
    text("🤔 Unknown action. Please try again!")
}

pub fn cancelled() -> String {
    lines(&[
        format!("🚫 {}", bold("Download Cancelled")),
        String::new(),
        text("No worries! Feel free to try again anytime. 🎵"),
    ])
}

pub fn downloading(track: &TrackInfo, quality: QualityTier) -> String {
    lines(&[
        format!("⬇️ {}", bold("Downloading...")),
        String::new(),
        format!("🎶 {}", bold(&track.name)),
        format!("👨‍🎤 {}", italic(&format!("by {}", track.artist))),
        format!("🎯 {}", italic(&format!("Quality: {}", quality))),
        String::new(),
        text("⏳ Finding and processing your track..."),
    ])
}

pub fn download_complete(track: &TrackInfo) -> String {
    lines(&[
        format!("✅ {}", bold("Download Complete!")),
        String::new(),
        format!("🎶 {}", bold(&track.name)),
        format!("👨‍🎤 {}", italic(&format!("by {}", track.artist))),
        String::new(),
        text("Enjoy your music! 🎧✨"),
    ])
}

pub fn download_failed(track: &TrackInfo, reason: &str) -> String {
    lines(&[
        format!("❌ {}", bold("Download failed!")),
        String::new(),
        format!("🎶 {}", bold(&track.name)),
        format!("👨‍🎤 {}", italic(&format!("by {}", track.artist))),
        String::new(),
        text(reason),
        text("Please try again later. 🔄"),
    ])
}

pub fn track_caption(track: &TrackInfo) -> String {
    format!(
        "🎶 {} by {}",
        bold(&truncate_text(&track.name, MAX_NAME_IN_CAPTION)),
        italic(&truncate_text(&track.artist, MAX_NAME_IN_CAPTION))
    )
}

pub fn collection_caption(track: &TrackInfo, kind: EntityKind, name: &str) -> String {
    format!(
        "💎 {} by {}\n{} {}",
        bold(&truncate_text(&track.name, MAX_NAME_IN_CAPTION)),
        italic(&truncate_text(&track.artist, MAX_NAME_IN_CAPTION)),
        collection_icon(kind),
        text(&format!("From {}: ", kind.as_str())) + &italic(&truncate_text(name, MAX_NAME_IN_CAPTION)),
    )
}

pub fn collection_started(kind: EntityKind, name: &str, total: usize, quality: QualityTier) -> String {
    lines(&[
        format!("🚀 {}", bold(&format!("Starting {} Download", kind.display_name()))),
        String::new(),
        format!("{} {}", collection_icon(kind), bold(name)),
        format!("🎶 {}", italic(&format!("Processing {} tracks...", total))),
        format!("🎯 {}", italic(&format!("Quality: {}", quality))),
        String::new(),
        text("⏳ Sit back and enjoy while I get your music! 🎶"),
    ])
}

/// Progress message shown before track `index` (1-based) of `total`.
pub fn collection_progress(kind: EntityKind, name: &str, index: usize, total: usize, track: &TrackInfo) -> String {
    lines(&[
        format!("💫 {}", bold(&format!("Downloading {}", kind.display_name()))),
        String::new(),
        format!("{} {}", collection_icon(kind), bold(name)),
        format!("🎶 {}", italic(&format!("Track {}/{}", index, total))),
        format!("🔥 {} by {}", bold(&track.name), italic(&track.artist)),
        String::new(),
        text(&format!("Progress: {}", create_progress_bar(index, total))),
    ])
}

pub fn collection_finished(kind: EntityKind, name: &str, delivered: usize, total: usize) -> String {
    lines(&[
        format!("🎉 {}", bold(&format!("{} Download Complete!", kind.display_name()))),
        String::new(),
        format!("{} {}", collection_icon(kind), bold(name)),
        format!(
            "💎 {}",
            italic(&format!("Successfully downloaded: {}/{} tracks", delivered, total))
        ),
        String::new(),
        text("Enjoy your amazing music collection! 🎶✨"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, artist: &str) -> TrackInfo {
        TrackInfo {
            id: "id".into(),
            name: name.into(),
            artist: artist.into(),
            album: "Album".into(),
            duration: "3:33".into(),
            duration_ms: 213_000,
            popularity: None,
            release_date: None,
            image_url: None,
            external_url: None,
            track_number: None,
        }
    }

    #[test]
    fn test_dynamic_values_are_escaped() {
        let msg = track_found(&track("Don't Stop Me Now (2011 Remaster)", "Queen"));
        assert!(msg.contains("Don't Stop Me Now \\(2011 Remaster\\)"));
        assert!(msg.contains("Duration: 3:33"));
    }

    #[test]
    fn test_static_texts_have_no_unescaped_reserved_chars() {
        // `.` and `!` outside of an escape sequence make Telegram reject MarkdownV2
        for msg in [welcome(), help(), analyzing(), cancelled(), share(), demo_menu()] {
            let mut prev = ' ';
            for c in msg.chars() {
                if matches!(c, '.' | '!' | '-' | '(' | ')') {
                    assert_eq!(prev, '\\', "unescaped {:?} in {:?}", c, msg);
                }
                prev = c;
            }
        }
    }

    #[test]
    fn test_not_found_names_the_kind() {
        assert!(not_found(EntityKind::Playlist).contains("Playlist not found\\!"));
        assert!(retrieval_error(EntityKind::Album).contains("Error retrieving album information\\."));
    }

    #[test]
    fn test_progress_contains_bar_and_position() {
        let msg = collection_progress(EntityKind::Playlist, "Mix", 5, 10, &track("Song", "Band"));
        assert!(msg.contains("Track 5/10"));
        assert!(msg.contains("█████░░░░░ 50%"));
    }

    #[test]
    fn test_collection_finished_summary() {
        let msg = collection_finished(EntityKind::Album, "Abbey Road", 15, 17);
        assert!(msg.contains("Album Download Complete\\!"));
        assert!(msg.contains("Successfully downloaded: 15/17 tracks"));
    }

    #[test]
    fn test_demo_link_uses_code_entity() {
        let msg = demo_link(Some("https://open.spotify.com/track/abc"));
        assert!(msg.contains("`https://open.spotify.com/track/abc`"));
        assert!(demo_link(None).contains("No demo tracks"));
    }

    #[test]
    fn test_share_text_mentions_bot() {
        assert_eq!(
            share_text("musicflow_bot"),
            "🎶 Check out this amazing MusicFlow Bot! @musicflow_bot 🎶"
        );
    }
}
