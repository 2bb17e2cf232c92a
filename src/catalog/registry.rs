//! Primary index: identity -> track, with title and artist lookups.

use crate::model::{Track, TrackId, normalize};
use std::collections::{HashMap, HashSet};

/// Owns the canonical [`Track`] records.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_id: HashMap<TrackId, Track>,
    /// Normalized title -> identities
    by_title: HashMap<String, Vec<TrackId>>,
    /// Normalized artist -> identities
    by_artist: HashMap<String, Vec<TrackId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Insert a track. Returns false (and changes nothing) if the identity
    /// is already present.
    pub fn insert(&mut self, track: Track) -> bool {
        if self.by_id.contains_key(&track.id) {
            return false;
        }
        self.by_title
            .entry(track.title_key())
            .or_default()
            .push(track.id.clone());
        self.by_artist
            .entry(track.artist_key())
            .or_default()
            .push(track.id.clone());
        self.by_id.insert(track.id.clone(), track);
        true
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.by_id.get(id)
    }

    /// Mutable access for fields that are not indexed (rating).
    pub(crate) fn get_mut(&mut self, id: &TrackId) -> Option<&mut Track> {
        self.by_id.get_mut(id)
    }

    pub fn remove(&mut self, id: &TrackId) -> Option<Track> {
        let track = self.by_id.remove(id)?;
        detach(&mut self.by_title, &track.title_key(), id);
        detach(&mut self.by_artist, &track.artist_key(), id);
        Some(track)
    }

    /// All tracks, in no particular order.
    pub fn all(&self) -> Vec<&Track> {
        self.by_id.values().collect()
    }

    pub fn ids(&self) -> HashSet<&TrackId> {
        self.by_id.keys().collect()
    }

    /// Exact title matches first, then titles containing `query`.
    pub fn search_by_title(&self, query: &str) -> Vec<&Track> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut results = Vec::new();
        let exact = self.by_title.get(&query).into_iter().flatten();
        let partial = self
            .by_title
            .iter()
            .filter(|(title, _)| **title != query && title.contains(&query))
            .flat_map(|(_, ids)| ids);
        for id in exact.chain(partial) {
            if seen.insert(id)
                && let Some(track) = self.by_id.get(id)
            {
                results.push(track);
            }
        }
        results
    }

    /// Tracks whose normalized artist equals `artist`.
    pub fn search_by_artist(&self, artist: &str) -> Vec<&Track> {
        self.by_artist
            .get(&normalize(artist))
            .into_iter()
            .flatten()
            .filter_map(|id| self.by_id.get(id))
            .collect()
    }

    /// Substring search over titles and artists, best matches first.
    pub fn search(&self, query: &str) -> Vec<&Track> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(&Track, f64)> = self
            .by_id
            .values()
            .filter_map(|track| {
                let score = relevance(&query, &track.title_key())
                    .max(relevance(&query, &track.artist_key()));
                (score > 0.0).then_some((track, score))
            })
            .collect();
        // Sequence keeps ties deterministic
        scored.sort_by(|(a, sa), (b, sb)| {
            sb.total_cmp(sa).then_with(|| a.sequence.cmp(&b.sequence))
        });
        scored.into_iter().map(|(track, _)| track).collect()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_title.clear();
        self.by_artist.clear();
    }
}

fn detach(index: &mut HashMap<String, Vec<TrackId>>, key: &str, id: &TrackId) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|other| other != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

/// Score how well `query` matches `text` (both normalized), 0.0 to 1.0.
///
/// Exact matches score 1. Otherwise the score is the mean of how early the
/// query appears and how much of the text it covers.
pub fn relevance(query: &str, text: &str) -> f64 {
    if query == text {
        return 1.0;
    }
    match text.find(query) {
        Some(offset) => {
            let len = text.len() as f64;
            let position_score = 1.0 - offset as f64 / len;
            let length_score = query.len() as f64 / len;
            (position_score + length_score) / 2.0
        }
        None => 0.0,
    }
}
