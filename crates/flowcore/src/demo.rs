//! Rotating catalog of well-known tracks for the "Try Demo" button.

use rand::seq::{IndexedRandom, SliceRandom};
use std::sync::{Mutex, MutexGuard};

use crate::spotify::validate_spotify_url;

const DEFAULT_DEMO_URLS: [&str; 20] = [
    "https://open.spotify.com/track/4iV5W9uYEdYUVa79Axb7Rh",
    "https://open.spotify.com/track/0VjIjW4GlULA8KFjAl1kgK",
    "https://open.spotify.com/track/11dFghVXANMlKmJXsNCbNl",
    "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC",
    "https://open.spotify.com/track/7qiZfU4dY1lWllzX7mPBI3",
    "https://open.spotify.com/track/2takcwOaAZWiXQijPHIx7B",
    "https://open.spotify.com/track/1Je1IMUlBXcx1Fz0WE7oPT",
    "https://open.spotify.com/track/5ghIJDpPoe3CfHMGu71E6T",
    "https://open.spotify.com/track/3a1lNhkSLSkpJE4MSHpDu9",
    "https://open.spotify.com/track/0tgVpDi06FyKpA1z0VMD4v",
    "https://open.spotify.com/track/6habFhsOp2NvshLv26DqMb",
    "https://open.spotify.com/track/1lDWb6b6ieDQ2xT7ewTC3G",
    "https://open.spotify.com/track/7BKLCZ1jbUBVqRi2FVlTVw",
    "https://open.spotify.com/track/6RUKPb4LETWmmr3iAEQktW",
    "https://open.spotify.com/track/4VqPOruhp5EdPBeR92t6lQ",
    "https://open.spotify.com/track/0wwPcA6wtMf6HUMpIRdeP7",
    "https://open.spotify.com/track/2Fxmhks0bxGSBdJ92vM42m",
    "https://open.spotify.com/track/4Dvkj6JhhA12EX05fT7y2e",
    "https://open.spotify.com/track/5tz69p7tJuGPeMGwNTxYuV",
    "https://open.spotify.com/track/4iJyoBOLtHqaGxP12qzhQI",
];

/// Demo track URLs. Shared between handlers, so every method takes `&self`.
#[derive(Debug)]
pub struct DemoSongs {
    urls: Mutex<Vec<String>>,
}

impl Default for DemoSongs {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSongs {
    /// The built-in catalog, shuffled.
    pub fn new() -> Self {
        let demo = Self::from_urls(DEFAULT_DEMO_URLS.iter().map(|s| s.to_string()).collect());
        demo.refresh();
        log::info!("Demo songs initialized with {} songs", demo.len());
        demo
    }

    pub fn from_urls(urls: Vec<String>) -> Self {
        Self { urls: Mutex::new(urls) }
    }

    fn urls(&self) -> MutexGuard<'_, Vec<String>> {
        self.urls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A random URL, or `None` when the catalog is empty.
    pub fn random_url(&self) -> Option<String> {
        let url = self.urls().choose(&mut rand::rng()).cloned();
        if let Some(url) = &url {
            log::info!("Providing demo URL: {}", url);
        }
        url
    }

    /// Up to `count` distinct random URLs.
    pub fn batch(&self, count: usize) -> Vec<String> {
        self.urls().choose_multiple(&mut rand::rng(), count).cloned().collect()
    }

    /// Reshuffles the catalog.
    pub fn refresh(&self) {
        self.urls().shuffle(&mut rand::rng());
        log::debug!("Demo song list refreshed");
    }

    /// Adds a URL; returns `false` for duplicates and invalid links.
    pub fn add(&self, url: &str) -> bool {
        if !validate_spotify_url(url) {
            log::warn!("Rejected demo song (not a Spotify link): {}", url);
            return false;
        }
        let mut urls = self.urls();
        if urls.iter().any(|u| u == url) {
            log::info!("Demo song already exists: {}", url);
            return false;
        }
        urls.push(url.to_string());
        log::info!("Added new demo song: {}", url);
        true
    }

    /// Removes a URL; returns `false` if it was not in the catalog.
    pub fn remove(&self, url: &str) -> bool {
        let mut urls = self.urls();
        match urls.iter().position(|u| u == url) {
            Some(index) => {
                urls.remove(index);
                log::info!("Removed demo song: {}", url);
                true
            }
            None => {
                log::warn!("Demo song not found: {}", url);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.urls().len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls().is_empty()
    }
}
