//! Inline-keyboard callback data.
//!
//! The strings produced by [`CallbackAction::data`] are stored by Telegram in
//! already-sent keyboards, so their format must stay stable.

use flowcore::{EntityKind, QualityTier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    MainMenu,
    Help,
    TryDemo,
    GetDemoUrl,
    ShareBot,
    /// `quality_<kbps>`: quality choice for the track in the chat session
    Quality(QualityTier),
    /// `download_playlist_<id>_<kbps>` / `download_album_<id>_<kbps>`
    DownloadCollection {
        kind: EntityKind,
        id: String,
        quality: QualityTier,
    },
    Cancel,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "main_menu" => return Some(Self::MainMenu),
            "help" => return Some(Self::Help),
            "try_demo" => return Some(Self::TryDemo),
            "get_demo_url" => return Some(Self::GetDemoUrl),
            "share_bot" => return Some(Self::ShareBot),
            "cancel_download" => return Some(Self::Cancel),
            _ => {}
        }

        if let Some(kbps) = data.strip_prefix("quality_") {
            return Some(Self::Quality(QualityTier::from_kbps(kbps)));
        }

        let (kind, rest) = if let Some(rest) = data.strip_prefix("download_playlist_") {
            (EntityKind::Playlist, rest)
        } else if let Some(rest) = data.strip_prefix("download_album_") {
            (EntityKind::Album, rest)
        } else {
            return None;
        };

        let (id, kbps) = rest.rsplit_once('_')?;
        if id.is_empty() {
            return None;
        }
        Some(Self::DownloadCollection {
            kind,
            id: id.to_string(),
            quality: QualityTier::from_kbps(kbps),
        })
    }

    pub fn data(&self) -> String {
        match self {
            Self::MainMenu => "main_menu".to_string(),
            Self::Help => "help".to_string(),
            Self::TryDemo => "try_demo".to_string(),
            Self::GetDemoUrl => "get_demo_url".to_string(),
            Self::ShareBot => "share_bot".to_string(),
            Self::Cancel => "cancel_download".to_string(),
            Self::Quality(quality) => format!("quality_{}", quality.as_str()),
            Self::DownloadCollection { kind, id, quality } => {
                format!("download_{}_{}_{}", kind.as_str(), id, quality.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_fixed_actions() {
        assert_eq!(CallbackAction::parse("main_menu"), Some(CallbackAction::MainMenu));
        assert_eq!(CallbackAction::parse("get_demo_url"), Some(CallbackAction::GetDemoUrl));
        assert_eq!(CallbackAction::parse("cancel_download"), Some(CallbackAction::Cancel));
        assert_eq!(CallbackAction::parse("share_bot"), Some(CallbackAction::ShareBot));
    }

    #[test]
    fn test_parse_quality() {
        assert_eq!(
            CallbackAction::parse("quality_320"),
            Some(CallbackAction::Quality(QualityTier::Premium))
        );
        // unknown bitrates fall back to the default tier
        assert_eq!(
            CallbackAction::parse("quality_999"),
            Some(CallbackAction::Quality(QualityTier::High))
        );
    }

    #[test]
    fn test_parse_collection_download() {
        assert_eq!(
            CallbackAction::parse("download_playlist_37i9dQZF1DXcBWIGoYBM5M_128"),
            Some(CallbackAction::DownloadCollection {
                kind: EntityKind::Playlist,
                id: "37i9dQZF1DXcBWIGoYBM5M".to_string(),
                quality: QualityTier::Standard,
            })
        );
        assert_eq!(
            CallbackAction::parse("download_album_4aawyAB9vmqN3uQ7FjRGTy_192"),
            Some(CallbackAction::DownloadCollection {
                kind: EntityKind::Album,
                id: "4aawyAB9vmqN3uQ7FjRGTy".to_string(),
                quality: QualityTier::High,
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(CallbackAction::parse("download_playlist_"), None);
        assert_eq!(CallbackAction::parse("download_track_abc_128"), None);
        assert_eq!(CallbackAction::parse("mode:settings"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }

    #[test]
    fn test_data_matches_parse() {
        let actions = [
            CallbackAction::Help,
            CallbackAction::TryDemo,
            CallbackAction::Quality(QualityTier::Standard),
            CallbackAction::DownloadCollection {
                kind: EntityKind::Album,
                id: "abc123".to_string(),
                quality: QualityTier::Premium,
            },
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.data()), Some(action));
        }
    }
}
