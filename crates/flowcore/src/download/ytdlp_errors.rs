//! Classification of yt-dlp failures from its stderr output.

/// yt-dlp failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// The search returned nothing
    NoResults,
    /// The matched video is private, removed or region-locked
    VideoUnavailable,
    /// YouTube flagged the request as automated
    BotDetection,
    /// Timeouts, DNS, refused connections
    NetworkError,
    Unknown,
}

impl YtDlpErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            YtDlpErrorType::NoResults => "no_results",
            YtDlpErrorType::VideoUnavailable => "video_unavailable",
            YtDlpErrorType::BotDetection => "bot_detection",
            YtDlpErrorType::NetworkError => "network",
            YtDlpErrorType::Unknown => "unknown",
        }
    }
}

/// Analyzes yt-dlp stderr and returns the error class.
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("no video results")
        || stderr_lower.contains("no results")
        || stderr_lower.contains("did not match any")
    {
        return YtDlpErrorType::NoResults;
    }

    if stderr_lower.contains("sign in to confirm you're not a bot")
        || stderr_lower.contains("bot detection")
        || stderr_lower.contains("http error 403")
        || stderr_lower.contains("http error 429")
        || stderr_lower.contains("signature extraction failed")
    {
        return YtDlpErrorType::BotDetection;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("not available in your country")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("timeout")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("dns")
        || stderr_lower.contains("failed to connect")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// User-facing explanation for a failed download.
pub fn get_error_message(error_type: YtDlpErrorType) -> &'static str {
    match error_type {
        YtDlpErrorType::NoResults => "No matching audio was found for this track.",
        YtDlpErrorType::VideoUnavailable => "The matching audio source is unavailable (private, removed or region-locked).",
        YtDlpErrorType::BotDetection => "The audio source is temporarily blocking requests. Please try again later.",
        YtDlpErrorType::NetworkError => "Network problem while downloading. Please try again in a minute.",
        YtDlpErrorType::Unknown => "The download failed. Please try again later.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_ytdlp_error() {
        assert_eq!(
            analyze_ytdlp_error("ERROR: [youtube:search] no video results"),
            YtDlpErrorType::NoResults
        );
        assert_eq!(
            analyze_ytdlp_error("ERROR: [youtube] abc: Sign in to confirm you're not a bot"),
            YtDlpErrorType::BotDetection
        );
        assert_eq!(
            analyze_ytdlp_error("ERROR: [youtube] abc: Private video. Sign in if you've been granted access"),
            YtDlpErrorType::VideoUnavailable
        );
        assert_eq!(
            analyze_ytdlp_error("ERROR: Unable to download webpage: <urlopen error [Errno -3] Temporary failure in name resolution> (caused by connection error)"),
            YtDlpErrorType::NetworkError
        );
        assert_eq!(analyze_ytdlp_error("ERROR: something odd"), YtDlpErrorType::Unknown);
    }

    #[test]
    fn test_every_class_has_a_message() {
        for kind in [
            YtDlpErrorType::NoResults,
            YtDlpErrorType::VideoUnavailable,
            YtDlpErrorType::BotDetection,
            YtDlpErrorType::NetworkError,
            YtDlpErrorType::Unknown,
        ] {
            assert!(!get_error_message(kind).is_empty());
        }
    }
}
