use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Target audio bitrate offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum QualityTier {
    /// 128 kbps
    Standard,
    /// 192 kbps
    #[default]
    High,
    /// 320 kbps
    Premium,
}

impl QualityTier {
    /// All tiers in the order they are shown on keyboards.
    pub const ALL: [QualityTier; 3] = [QualityTier::Standard, QualityTier::High, QualityTier::Premium];

    pub fn kbps(&self) -> u32 {
        match self {
            QualityTier::Standard => 128,
            QualityTier::High => 192,
            QualityTier::Premium => 320,
        }
    }

    /// Value used in callback data and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Standard => "128",
            QualityTier::High => "192",
            QualityTier::Premium => "320",
        }
    }

    /// Inline keyboard button label.
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Standard => "✨ Standard (128kbps)",
            QualityTier::High => "🚀 High (192kbps)",
            QualityTier::Premium => "💎 Premium (320kbps)",
        }
    }

    /// yt-dlp `-f` selector for this tier.
    pub fn format_selector(&self) -> &'static str {
        match self {
            QualityTier::Standard => "bestaudio[abr<=128]/bestaudio",
            QualityTier::High => "bestaudio[abr<=192]/bestaudio",
            QualityTier::Premium => "bestaudio/best",
        }
    }

    /// Lenient parse: unknown values fall back to [`QualityTier::High`].
    pub fn from_kbps(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("kbps") {
            "128" => Ok(QualityTier::Standard),
            "192" => Ok(QualityTier::High),
            "320" => Ok(QualityTier::Premium),
            other => Err(format!("unsupported quality '{}', expected 128, 192 or 320", other)),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kbps", self.kbps())
    }
}
