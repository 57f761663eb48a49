//! Per-chat request context awaiting a quality choice

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use teloxide::types::ChatId;

use flowcore::spotify::TrackInfo;
use flowcore::{EntityKind, Metadata};

#[derive(Debug, Clone)]
pub struct Session {
    /// Link the user sent
    pub url: String,
    pub metadata: Metadata,
    pub created_at: Instant,
}

impl Session {
    pub fn new(url: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            url: url.into(),
            metadata,
            created_at: Instant::now(),
        }
    }

    /// Spotify ID of the resolved entity.
    pub fn entity_id(&self) -> &str {
        match &self.metadata {
            Metadata::Track(t) => &t.id,
            Metadata::Playlist(p) => &p.id,
            Metadata::Album(a) => &a.id,
        }
    }
}

/// One session per chat; a new link replaces the previous one.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<ChatId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ChatId, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores the session, returning the one it replaced.
    pub fn insert(&self, chat_id: ChatId, session: Session) -> Option<Session> {
        self.lock().insert(chat_id, session)
    }

    pub fn take(&self, chat_id: ChatId) -> Option<Session> {
        self.lock().remove(&chat_id)
    }

    /// Takes the session only if it holds a single track.
    pub fn take_track(&self, chat_id: ChatId) -> Option<TrackInfo> {
        let mut sessions = self.lock();
        match sessions.get(&chat_id).map(|s| &s.metadata) {
            Some(Metadata::Track(_)) => match sessions.remove(&chat_id).map(|s| s.metadata) {
                Some(Metadata::Track(track)) => Some(track),
                _ => None,
            },
            _ => None,
        }
    }

    /// Takes the session only if it holds the playlist/album `id`.
    pub fn take_collection(&self, chat_id: ChatId, kind: EntityKind, id: &str) -> Option<Metadata> {
        let mut sessions = self.lock();
        let matches = sessions
            .get(&chat_id)
            .is_some_and(|s| s.metadata.kind() == kind && s.entity_id() == id);
        if matches {
            sessions.remove(&chat_id).map(|s| s.metadata)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
