//! Spotify link parsing.
//!
//! Accepts web links (`https://open.spotify.com/track/<id>`, with or without
//! scheme, locale segment or query string) and URIs (`spotify:track:<id>`).

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::models::EntityKind;

/// Web link to a supported entity. Tried before the URI form.
static WEB_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"spotify\.com/(?:intl-[A-Za-z-]+/)?(track|playlist|album)/([A-Za-z0-9]+)").expect("web link regex")
});

static URI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"spotify:(track|playlist|album):([A-Za-z0-9]+)").expect("uri link regex"));

/// Links to entities the bot knows about but cannot download.
static UNSUPPORTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"spotify(?:\.com/(?:intl-[A-Za-z-]+/)?|:)(artist|show|episode|user)[/:]").expect("unsupported regex")
});

static STRICT_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://open\.spotify\.com/(?:track|playlist|album)/[A-Za-z0-9]+(?:\?\S*)?|spotify:(?:track|playlist|album):[A-Za-z0-9]+)$")
        .expect("strict url regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("unrecognized link")]
    Unrecognized,
    #[error("unsupported link type: {0}")]
    UnsupportedKind(String),
}

/// A parsed link: what it points at and the Spotify ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpotifyLink {
    pub kind: EntityKind,
    pub id: String,
}

impl SpotifyLink {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    /// Canonical `https://open.spotify.com/<kind>/<id>` link.
    pub fn web_url(&self) -> String {
        format!("https://open.spotify.com/{}/{}", self.kind, self.id)
    }

    pub fn uri(&self) -> String {
        format!("spotify:{}:{}", self.kind, self.id)
    }
}

fn captures_to_link(re: &Regex, input: &str) -> Option<SpotifyLink> {
    let caps = re.captures(input)?;
    let kind = EntityKind::from_name(caps.get(1)?.as_str())?;
    Some(SpotifyLink::new(kind, caps.get(2)?.as_str()))
}

/// Extracts the entity kind and ID from a Spotify link.
///
/// # Errors
/// - `LinkError::UnsupportedKind` for artist/show/episode/user links
/// - `LinkError::Unrecognized` for anything else that does not match
///
/// # Example
///
/// ```
/// use flowcore::spotify::{parse_link, EntityKind};
///
/// let link = parse_link("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=x").unwrap();
/// assert_eq!(link.kind, EntityKind::Track);
/// assert_eq!(link.id, "4uLU6hMCjMI75M1A2tKUQC");
/// ```
pub fn parse_link(input: &str) -> Result<SpotifyLink, LinkError> {
    let input = input.trim();

    if let Some(link) = captures_to_link(&WEB_LINK_RE, input) {
        log::debug!("Extracted {} ID: {}", link.kind, link.id);
        return Ok(link);
    }
    if let Some(link) = captures_to_link(&URI_LINK_RE, input) {
        log::debug!("Extracted {} ID from URI: {}", link.kind, link.id);
        return Ok(link);
    }

    if let Some(caps) = UNSUPPORTED_RE.captures(input) {
        let kind = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Err(LinkError::UnsupportedKind(kind.to_string()));
    }

    Err(LinkError::Unrecognized)
}

/// Cheap prefilter: does the text mention Spotify at all?
pub fn is_spotify_link(text: &str) -> bool {
    text.contains("spotify.com") || text.contains("spotify:")
}

/// Strict check that the whole string is a supported open.spotify.com URL or
/// Spotify URI.
pub fn validate_spotify_url(url: &str) -> bool {
    STRICT_URL_RE.is_match(url)
}
