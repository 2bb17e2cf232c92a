//! Blocked artists, compared case-insensitively.

use crate::model::{Track, normalize};
use std::collections::HashSet;

/// Set of normalized (trimmed, lower-cased) artist names.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    artists: HashSet<String>,
}

impl Denylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block an artist. Returns true if it was not already blocked.
    ///
    /// Blank names are ignored.
    pub fn block(&mut self, artist: &str) -> bool {
        let key = normalize(artist);
        if key.is_empty() {
            return false;
        }
        self.artists.insert(key)
    }

    /// Unblock an artist. Returns true if it was blocked.
    pub fn unblock(&mut self, artist: &str) -> bool {
        self.artists.remove(&normalize(artist))
    }

    pub fn is_blocked(&self, artist: &str) -> bool {
        self.artists.contains(&normalize(artist))
    }

    /// Blocked names in normalized form, sorted.
    pub fn all(&self) -> Vec<String> {
        let mut artists: Vec<String> = self.artists.iter().cloned().collect();
        artists.sort();
        artists
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// Block several artists; returns how many were newly blocked.
    pub fn block_all<'a>(&mut self, artists: impl IntoIterator<Item = &'a str>) -> usize {
        artists.into_iter().filter(|a| self.block(a)).count()
    }

    /// Unblock several artists; returns how many were removed.
    pub fn unblock_all<'a>(&mut self, artists: impl IntoIterator<Item = &'a str>) -> usize {
        artists.into_iter().filter(|a| self.unblock(a)).count()
    }

    /// Keep only tracks whose artist is not blocked.
    pub fn filter<'t>(&self, tracks: impl IntoIterator<Item = &'t Track>) -> Vec<&'t Track> {
        tracks
            .into_iter()
            .filter(|t| !self.is_blocked(&t.artist))
            .collect()
    }

    /// Blocked names containing `artist`, or contained in it.
    pub fn similar(&self, artist: &str) -> Vec<String> {
        let query = normalize(artist);
        if query.is_empty() {
            return Vec::new();
        }
        let mut matches: Vec<String> = self
            .artists
            .iter()
            .filter(|blocked| blocked.contains(&query) || query.contains(blocked.as_str()))
            .cloned()
            .collect();
        matches.sort();
        matches
    }

    pub fn clear(&mut self) {
        self.artists.clear();
    }
}
