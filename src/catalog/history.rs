//! Play history: a bounded stack of played track snapshots.
//!
//! Entries are owned copies, so a play stays on record after its track is
//! deleted from the catalog.

use crate::model::{Track, TrackId};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Default number of plays kept.
pub const DEFAULT_MAX_SIZE: usize = 50;

/// Bounded LIFO log of played tracks.
#[derive(Debug, Clone)]
pub struct PlayHistory {
    /// Oldest at the front, most recent at the back
    entries: VecDeque<Track>,
    max_size: usize,
    /// Every recorded play, including evicted and undone ones
    total_plays: u64,
}

/// Play count for one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCount {
    pub track: Track,
    pub play_count: usize,
}

/// Play count for one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistPlays {
    pub artist: String,
    pub play_count: usize,
}

/// Aggregate listening statistics over the retained history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningPatterns {
    /// Sum of durations, seconds
    pub total_listening_time: u64,
    pub average_track_length: f64,
    pub unique_tracks: usize,
    pub unique_artists: usize,
    pub total_plays: u64,
    pub history_size: usize,
}

impl Default for PlayHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl PlayHistory {
    /// Create a history keeping at most `max_size` plays (at least one).
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: VecDeque::with_capacity(max_size + 1),
            max_size,
            total_plays: 0,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_plays(&self) -> u64 {
        self.total_plays
    }

    /// Push a play, evicting the oldest entry when over capacity.
    pub fn record(&mut self, track: Track) {
        self.entries.push_back(track);
        self.total_plays += 1;
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }

    /// Pop the most recent play.
    pub fn undo_last(&mut self) -> Option<Track> {
        self.entries.pop_back()
    }

    pub fn peek_last(&self) -> Option<&Track> {
        self.entries.back()
    }

    /// Up to `limit` plays, most recent first.
    pub fn snapshot(&self, limit: usize) -> Vec<Track> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Most played tracks in the retained history.
    ///
    /// Ties keep the order in which tracks first appear (oldest first).
    pub fn most_played(&self, count: usize) -> Vec<PlayCount> {
        let mut order: Vec<&TrackId> = Vec::new();
        let mut counts: HashMap<&TrackId, (usize, &Track)> = HashMap::new();
        for track in &self.entries {
            counts
                .entry(&track.id)
                .and_modify(|(n, _)| *n += 1)
                .or_insert_with(|| {
                    order.push(&track.id);
                    (1, track)
                });
        }

        let mut ranked: Vec<PlayCount> = order
            .into_iter()
            .map(|id| {
                let (play_count, track) = counts[id];
                PlayCount {
                    track: track.clone(),
                    play_count,
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.play_count.cmp(&a.play_count));
        ranked.truncate(count);
        ranked
    }

    /// Artist play counts over the `count` most recent plays.
    pub fn recent_artists(&self, count: usize) -> Vec<ArtistPlays> {
        let mut ranked: Vec<ArtistPlays> = Vec::new();
        for track in self.entries.iter().rev().take(count) {
            match ranked.iter_mut().find(|a| a.artist == track.artist) {
                Some(entry) => entry.play_count += 1,
                None => ranked.push(ArtistPlays {
                    artist: track.artist.clone(),
                    play_count: 1,
                }),
            }
        }
        ranked.sort_by(|a, b| b.play_count.cmp(&a.play_count));
        ranked
    }

    pub fn listening_patterns(&self) -> ListeningPatterns {
        if self.entries.is_empty() {
            return ListeningPatterns {
                total_plays: self.total_plays,
                ..Default::default()
            };
        }
        let total: u64 = self.entries.iter().map(|t| u64::from(t.duration)).sum();
        let unique_tracks = self.entries.iter().map(|t| &t.id).collect::<HashSet<_>>().len();
        let unique_artists = self
            .entries
            .iter()
            .map(|t| t.artist.as_str())
            .collect::<HashSet<_>>()
            .len();
        ListeningPatterns {
            total_listening_time: total,
            average_track_length: total as f64 / self.entries.len() as f64,
            unique_tracks,
            unique_artists,
            total_plays: self.total_plays,
            history_size: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::track;

    #[test]
    fn test_lifo_order() {
        let mut history = PlayHistory::default();
        let a = track("a", "x", 10);
        let b = track("b", "y", 20);
        history.record(a.clone());
        history.record(b.clone());

        assert_eq!(history.peek_last(), Some(&b));
        assert_eq!(history.undo_last(), Some(b));
        assert_eq!(history.undo_last(), Some(a));
        assert_eq!(history.undo_last(), None);
        assert_eq!(history.total_plays(), 2);
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut history = PlayHistory::new(50);
        let tracks: Vec<Track> = (0..51).map(|i| track(&format!("t{i}"), "x", 1)).collect();
        for t in &tracks {
            history.record(t.clone());
        }

        let snapshot = history.snapshot(50);
        assert_eq!(snapshot.len(), 50);
        assert!(!snapshot.contains(&tracks[0]));
        assert_eq!(snapshot[0], tracks[50]);
        assert_eq!(snapshot[49], tracks[1]);
        assert_eq!(history.total_plays(), 51);
    }

    #[test]
    fn test_snapshot_limit() {
        let mut history = PlayHistory::default();
        for i in 0..5 {
            history.record(track(&format!("t{i}"), "x", 1));
        }
        let titles: Vec<String> = history.snapshot(3).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["t4", "t3", "t2"]);
        assert_eq!(history.snapshot(0).len(), 0);
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let mut history = PlayHistory::new(0);
        history.record(track("a", "x", 1));
        history.record(track("b", "x", 1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.peek_last().unwrap().title, "b");
    }

    #[test]
    fn test_most_played() {
        let mut history = PlayHistory::default();
        let a = track("a", "x", 10);
        let b = track("b", "y", 10);
        for t in [&a, &b, &b, &a, &b] {
            history.record(t.clone());
        }
        let ranked = history.most_played(5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].track.id, b.id);
        assert_eq!(ranked[0].play_count, 3);
        assert_eq!(ranked[1].play_count, 2);
        assert_eq!(history.most_played(1).len(), 1);
    }

    #[test]
    fn test_recent_artists() {
        let mut history = PlayHistory::default();
        history.record(track("1", "Old", 10));
        history.record(track("2", "A", 10));
        history.record(track("3", "B", 10));
        history.record(track("4", "A", 10));

        let artists = history.recent_artists(3);
        assert_eq!(artists[0], ArtistPlays { artist: "A".into(), play_count: 2 });
        assert_eq!(artists[1], ArtistPlays { artist: "B".into(), play_count: 1 });
        assert_eq!(artists.len(), 2);
    }

    #[test]
    fn test_listening_patterns() {
        let mut history = PlayHistory::default();
        assert_eq!(history.listening_patterns().history_size, 0);

        let a = track("a", "x", 100);
        history.record(a.clone());
        history.record(a);
        history.record(track("b", "y", 40));

        let patterns = history.listening_patterns();
        assert_eq!(patterns.total_listening_time, 240);
        assert_eq!(patterns.average_track_length, 80.0);
        assert_eq!(patterns.unique_tracks, 2);
        assert_eq!(patterns.unique_artists, 2);
        assert_eq!(patterns.total_plays, 3);
    }
}
