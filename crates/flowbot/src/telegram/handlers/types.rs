//! Handler types and dependencies

use std::sync::Arc;

use flowcore::{AudioFetcher, DemoSongs, SpotifyClient};

use crate::telegram::session::SessionStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub spotify: Arc<SpotifyClient>,
    pub fetcher: Arc<AudioFetcher>,
    pub sessions: Arc<SessionStore>,
    pub demo: Arc<DemoSongs>,
    /// Used to build the share link; `None` hides the share button
    pub bot_username: Option<String>,
}

impl HandlerDeps {
    /// Create new handler dependencies with an empty session store
    pub fn new(
        spotify: Arc<SpotifyClient>,
        fetcher: Arc<AudioFetcher>,
        demo: Arc<DemoSongs>,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            spotify,
            fetcher,
            sessions: Arc::new(SessionStore::new()),
            demo,
            bot_username,
        }
    }
}
