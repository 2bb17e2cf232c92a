//! The catalog engine: the one entry point collaborators use.
//!
//! Every public method is a complete transaction over the owned structures.
//! Inputs are validated before anything is touched, so a rejected call
//! leaves registry, playlist, rating index and history exactly as they were.

use std::collections::HashSet;
use tracing::{debug, warn};

use super::denylist::Denylist;
use super::history::{ArtistPlays, ListeningPatterns, PlayCount, PlayHistory};
use super::playlist::Playlist;
use super::ratings::RatingIndex;
use super::registry::Registry;
use super::snapshot::{Analytics, PlaylistStats, RatingStats, Snapshot};
use super::sorter::{self, SortCriterion, SortDirection};
use crate::config::{Config, SnapshotConfig};
use crate::error::{Error, Result, ValidationError};
use crate::model::{Rating, Track, TrackId};

/// In-memory catalog of tracks with play order, ratings, history and a
/// denylist kept mutually consistent.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: Registry,
    playlist: Playlist,
    ratings: RatingIndex,
    history: PlayHistory,
    denylist: Denylist,
    snapshot_config: SnapshotConfig,
    /// Next creation sequence number
    next_sequence: u64,
}

/// A broken cross-structure invariant, reported by [`Engine::verify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    #[error("playlist links are corrupt")]
    PlaylistLinks,

    #[error("playlist has {playlist} tracks but registry has {registry}")]
    Membership { playlist: usize, registry: usize },

    #[error("track {0} appears in the playlist but not the registry")]
    Unregistered(TrackId),

    #[error("track {0} is registered but missing from the playlist")]
    Unlisted(TrackId),

    #[error("track {0} is filed under rating {1} but its rating differs")]
    RatingMismatch(TrackId, u8),
}

impl Engine {
    /// Create an empty engine with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine using the limits and initial denylist from `config`.
    pub fn with_config(config: &Config) -> Self {
        let mut denylist = Denylist::new();
        let blocked = denylist.block_all(config.denylist.artists.iter().map(String::as_str));
        debug!("Engine created with {} blocked artists", blocked);
        Self {
            history: PlayHistory::new(config.history.max_size),
            denylist,
            snapshot_config: config.snapshot.clone(),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Playlist mutations
    // ------------------------------------------------------------------

    /// Create a track and append it to the playlist.
    ///
    /// Fails with [`Error::Validation`] for a blank title or artist or a zero
    /// duration, and with [`Error::Blocked`] when the artist is denylisted.
    pub fn add_track(&mut self, title: &str, artist: &str, duration: u32) -> Result<Track> {
        let len = self.playlist.len();
        self.insert_track_at(len, title, artist, duration)
    }

    /// Create a track and insert it at `index` (`index == len` appends).
    pub fn insert_track_at(
        &mut self,
        index: usize,
        title: &str,
        artist: &str,
        duration: u32,
    ) -> Result<Track> {
        self.check_new_track(title, artist, duration)?;
        let len = self.playlist.len();
        if index > len {
            return Err(ValidationError::IndexOutOfRange { index, len }.into());
        }

        let track = Track::new(title, artist, duration, self.next_sequence);
        self.next_sequence += 1;
        let registered = self.registry.insert(track.clone());
        debug_assert!(registered, "fresh track id {} already registered", track.id);
        let placed = self.playlist.insert_at(index, track.id.clone());
        debug_assert!(placed, "index {} checked against len {}", index, len);
        debug!("Added track {} \"{}\" at {}", track.id, track.title, index);
        Ok(track)
    }

    /// Remove the track at `index` from playlist, registry and rating index.
    ///
    /// Returns `None` if `index` is out of range.
    pub fn delete_track(&mut self, index: usize) -> Option<Track> {
        let id = self.playlist.remove_at(index)?;
        self.ratings.remove(&id);
        let track = self.registry.remove(&id);
        debug!("Deleted track {} from position {}", id, index);
        track
    }

    /// Move a track; see [`Playlist::move_to`] for the index rule.
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        let moved = self.playlist.move_to(from, to);
        if moved {
            debug!("Moved track {} -> {}", from, to);
        }
        moved
    }

    pub fn reverse(&mut self) {
        self.playlist.reverse();
        debug!("Reversed playlist of {} tracks", self.playlist.len());
    }

    /// Reorder the playlist with the stable sort. Ratings and registry are
    /// untouched.
    pub fn sort(&mut self, criterion: SortCriterion, direction: SortDirection) {
        let sorted = sorter::sort(&self.tracks(), criterion, direction);
        self.rebuild_order(sorted);
        debug!("Sorted playlist by {} ({:?})", criterion.as_str(), direction);
    }

    /// Reorder the playlist randomly.
    pub fn shuffle(&mut self) {
        let shuffled = sorter::shuffle(&self.tracks());
        self.rebuild_order(shuffled);
        debug!("Shuffled playlist");
    }

    fn rebuild_order(&mut self, ordered: Vec<Track>) {
        self.playlist = ordered.into_iter().map(|t| t.id).collect();
    }

    // ------------------------------------------------------------------
    // Plays and ratings
    // ------------------------------------------------------------------

    /// Record a play. Returns false if the identity is unknown.
    pub fn play_track(&mut self, id: &TrackId) -> bool {
        let Some(track) = self.registry.get(id) else {
            return false;
        };
        self.history.record(track.clone());
        debug!("Played track {}", id);
        true
    }

    /// Set a track's rating and refile it in the rating index.
    ///
    /// Fails with [`Error::Validation`] for a rating outside 1-5; returns
    /// `Ok(false)` if the identity is unknown.
    pub fn rate_track(&mut self, id: &TrackId, rating: u8) -> Result<bool> {
        let rating = Rating::new(rating).ok_or(ValidationError::RatingOutOfRange(rating))?;
        let Some(track) = self.registry.get_mut(id) else {
            return Ok(false);
        };
        track.rating = Some(rating);
        self.ratings.insert(id.clone(), rating);
        debug!("Rated track {} as {}", id, rating.get());
        Ok(true)
    }

    /// Pop the most recent play.
    pub fn undo_play(&mut self) -> Option<Track> {
        let undone = self.history.undo_last();
        if let Some(track) = &undone {
            debug!("Undid play of {}", track.id);
        }
        undone
    }

    pub fn last_played(&self) -> Option<&Track> {
        self.history.peek_last()
    }

    /// Up to `limit` plays, most recent first.
    pub fn history(&self, limit: usize) -> Vec<Track> {
        self.history.snapshot(limit)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ------------------------------------------------------------------
    // Denylist
    // ------------------------------------------------------------------

    /// Block an artist for future additions. Tracks already in the catalog
    /// stay. Returns true if newly blocked.
    pub fn block_artist(&mut self, artist: &str) -> bool {
        let blocked = self.denylist.block(artist);
        if blocked {
            debug!("Blocked artist \"{}\"", artist.trim());
        }
        blocked
    }

    /// Returns true if the artist was blocked.
    pub fn unblock_artist(&mut self, artist: &str) -> bool {
        let unblocked = self.denylist.unblock(artist);
        if unblocked {
            debug!("Unblocked artist \"{}\"", artist.trim());
        }
        unblocked
    }

    pub fn is_blocked(&self, artist: &str) -> bool {
        self.denylist.is_blocked(artist)
    }

    pub fn blocked_artists(&self) -> Vec<String> {
        self.denylist.all()
    }

    /// Blocked names related to `artist` by substring.
    pub fn similar_blocked_artists(&self, artist: &str) -> Vec<String> {
        self.denylist.similar(artist)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.registry.get(id)
    }

    pub fn track_at(&self, index: usize) -> Option<&Track> {
        self.playlist.get(index).and_then(|id| self.registry.get(id))
    }

    pub fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.playlist.position(id)
    }

    /// Tracks in playlist order.
    pub fn tracks(&self) -> Vec<Track> {
        self.resolve(self.playlist.iter())
    }

    pub fn rating_of(&self, id: &TrackId) -> Option<u8> {
        self.ratings.rating_of(id).map(Rating::get)
    }

    /// Tracks filed under exactly `rating`, in the order they were rated.
    /// Empty for ratings outside 1-5.
    pub fn tracks_with_rating(&self, rating: u8) -> Vec<Track> {
        match Rating::new(rating) {
            Some(rating) => self.resolve(self.ratings.search(rating).iter()),
            None => Vec::new(),
        }
    }

    /// Up to `count` tracks, highest rated first.
    pub fn top_rated(&self, count: usize) -> Vec<Track> {
        self.resolve(self.ratings.top_rated(count).iter())
    }

    /// Ranked search over titles and artists.
    pub fn search(&self, query: &str) -> Vec<Track> {
        self.registry.search(query).into_iter().cloned().collect()
    }

    pub fn search_by_title(&self, query: &str) -> Vec<Track> {
        self.registry.search_by_title(query).into_iter().cloned().collect()
    }

    pub fn search_by_artist(&self, artist: &str) -> Vec<Track> {
        self.registry.search_by_artist(artist).into_iter().cloned().collect()
    }

    pub fn most_played(&self, count: usize) -> Vec<PlayCount> {
        self.history.most_played(count)
    }

    pub fn recent_artists(&self, count: usize) -> Vec<ArtistPlays> {
        self.history.recent_artists(count)
    }

    pub fn listening_patterns(&self) -> ListeningPatterns {
        self.history.listening_patterns()
    }

    pub fn playlist_stats(&self) -> PlaylistStats {
        let tracks = self.tracks();
        if tracks.is_empty() {
            return PlaylistStats::default();
        }
        let total: u64 = tracks.iter().map(|t| u64::from(t.duration)).sum();
        // First of equals wins for both extremes
        let longest = tracks
            .iter()
            .reduce(|best, t| if t.duration > best.duration { t } else { best })
            .cloned();
        let shortest = tracks
            .iter()
            .reduce(|best, t| if t.duration < best.duration { t } else { best })
            .cloned();
        PlaylistStats {
            total_tracks: tracks.len(),
            total_duration: total,
            average_duration: total as f64 / tracks.len() as f64,
            longest,
            shortest,
        }
    }

    pub fn rating_stats(&self) -> RatingStats {
        RatingStats {
            total_rated: self.ratings.len(),
            average_rating: self.ratings.average(),
            distribution: self.ratings.distribution(),
            tree_height: self.ratings.height(),
        }
    }

    /// Consistent point-in-time view of the whole catalog.
    pub fn snapshot(&self) -> Snapshot {
        let tracks = self.tracks();
        let longest_tracks = sorter::sort(&tracks, SortCriterion::Duration, SortDirection::Descending)
            .into_iter()
            .take(self.snapshot_config.longest_tracks)
            .collect();
        let analytics = Analytics {
            total_tracks: tracks.len(),
            total_duration: tracks.iter().map(|t| u64::from(t.duration)).sum(),
            longest_tracks,
            rating_distribution: self.ratings.distribution(),
            total_plays: self.history.total_plays(),
            blocked_artists_count: self.denylist.len(),
        };
        Snapshot {
            tracks,
            history: self.history.snapshot(self.snapshot_config.history_limit),
            ratings: self
                .ratings
                .ratings()
                .iter()
                .map(|(id, rating)| (id.to_string(), rating.get()))
                .collect(),
            blocked_artists: self.denylist.all(),
            analytics,
        }
    }

    /// Check membership, rating index and playlist link invariants.
    pub fn verify(&self) -> std::result::Result<(), Inconsistency> {
        if !self.playlist.is_consistent() {
            return Err(Inconsistency::PlaylistLinks);
        }
        if self.playlist.len() != self.registry.len() {
            return Err(Inconsistency::Membership {
                playlist: self.playlist.len(),
                registry: self.registry.len(),
            });
        }
        let listed: HashSet<&TrackId> = self.playlist.iter().collect();
        let registered = self.registry.ids();
        if let Some(id) = listed.difference(&registered).next() {
            return Err(Inconsistency::Unregistered((*id).clone()));
        }
        if let Some(id) = registered.difference(&listed).next() {
            return Err(Inconsistency::Unlisted((*id).clone()));
        }
        for (rating, bucket) in self.ratings.buckets() {
            for id in bucket {
                let filed = self.registry.get(id).and_then(|t| t.rating);
                if filed != Some(rating) {
                    return Err(Inconsistency::RatingMismatch(id.clone(), rating.get()));
                }
            }
        }
        Ok(())
    }

    fn check_new_track(&self, title: &str, artist: &str, duration: u32) -> Result<()> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if artist.trim().is_empty() {
            return Err(ValidationError::EmptyArtist.into());
        }
        if duration == 0 {
            return Err(ValidationError::ZeroDuration.into());
        }
        if self.denylist.is_blocked(artist) {
            warn!("Rejected track by blocked artist \"{}\"", artist.trim());
            return Err(Error::blocked(artist.trim()));
        }
        Ok(())
    }

    fn resolve<'a>(&self, ids: impl Iterator<Item = &'a TrackId>) -> Vec<Track> {
        ids.filter_map(|id| self.registry.get(id)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{engine_with, titles};

    #[test]
    fn test_add_and_delete_round_trip() {
        let mut engine = Engine::new();
        let track = engine.add_track("Song", "Artist", 180).unwrap();
        engine.rate_track(&track.id, 4).unwrap();

        let deleted = engine.delete_track(0).unwrap();
        assert_eq!(deleted.id, track.id);
        assert!(engine.is_empty());
        assert!(engine.track(&track.id).is_none());
        assert!(engine.tracks_with_rating(4).is_empty());
        assert_eq!(engine.rating_of(&track.id), None);
        engine.verify().unwrap();
    }

    #[test]
    fn test_add_validation() {
        let mut engine = Engine::new();
        let err = engine.add_track("  ", "a", 1).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyTitle)));
        let err = engine.add_track("t", "", 1).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyArtist)));
        let err = engine.add_track("t", "a", 0).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::ZeroDuration)));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_blocked_artist_is_policy_rejection() {
        let mut engine = Engine::new();
        engine.block_artist("Drake");
        for artist in ["drake", "DRAKE", " Drake "] {
            let err = engine.add_track("Hotline", artist, 200).unwrap_err();
            assert!(err.is_blocked(), "{artist} should be blocked");
            assert!(!err.is_validation());
        }
        assert!(engine.is_empty());

        assert!(engine.unblock_artist("drake"));
        assert!(engine.add_track("Hotline", "Drake", 200).is_ok());
    }

    #[test]
    fn test_unblock_unknown_artist_is_noop() {
        let mut engine = Engine::new();
        engine.block_artist("a");
        let before = engine.snapshot();
        assert!(!engine.unblock_artist("b"));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_verify_catches_duplicate_playlist_entry() {
        let mut engine = engine_with(&["a", "b"]);
        engine.verify().unwrap();

        // Same length on both sides, but "b" is replaced by a second "a"
        let a = engine.track_at(0).unwrap().id.clone();
        let b = engine.playlist.remove_at(1).unwrap();
        engine.playlist.append(a);
        assert_eq!(engine.verify(), Err(Inconsistency::Unlisted(b)));
    }

    #[test]
    fn test_verify_catches_unregistered_entry() {
        let mut engine = engine_with(&["a"]);
        let stray = TrackId::from("stray");
        engine.playlist.remove_at(0);
        engine.playlist.append(stray.clone());
        assert_eq!(engine.verify(), Err(Inconsistency::Unregistered(stray)));
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut engine = engine_with(&["a", "b"]);
        assert!(engine.delete_track(2).is_none());
        assert_eq!(engine.len(), 2);
        engine.verify().unwrap();
    }

    #[test]
    fn test_move_track_contract() {
        let mut engine = engine_with(&["A", "B", "C", "D"]);
        assert!(engine.move_track(0, 2));
        assert_eq!(titles(&engine), vec!["B", "A", "C", "D"]);
        assert!(!engine.move_track(0, 4));
        assert!(engine.move_track(1, 1));
        assert_eq!(titles(&engine), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_insert_track_at() {
        let mut engine = engine_with(&["a", "c"]);
        engine.insert_track_at(1, "b", "x", 10).unwrap();
        assert_eq!(titles(&engine), vec!["a", "b", "c"]);
        let err = engine.insert_track_at(9, "z", "x", 10).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::IndexOutOfRange { index: 9, len: 3 })
        ));
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn test_reverse_and_sort() {
        let mut engine = engine_with(&["b", "c", "a"]);
        engine.reverse();
        assert_eq!(titles(&engine), vec!["a", "c", "b"]);

        engine.sort(SortCriterion::Title, SortDirection::Ascending);
        assert_eq!(titles(&engine), vec!["a", "b", "c"]);

        engine.sort(SortCriterion::CreatedAt, SortDirection::Ascending);
        assert_eq!(titles(&engine), vec!["b", "c", "a"]);
        engine.verify().unwrap();
    }

    #[test]
    fn test_sort_by_artist_is_stable() {
        let mut engine = Engine::new();
        engine.add_track("1", "B", 5).unwrap();
        engine.add_track("2", "A", 3).unwrap();
        engine.add_track("3", "B", 4).unwrap();
        engine.sort(SortCriterion::Artist, SortDirection::Ascending);
        assert_eq!(titles(&engine), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_sort_keeps_ratings() {
        let mut engine = engine_with(&["b", "a"]);
        let id = engine.track_at(0).unwrap().id.clone();
        engine.rate_track(&id, 5).unwrap();
        engine.sort(SortCriterion::Title, SortDirection::Ascending);
        assert_eq!(engine.index_of(&id), Some(1));
        assert_eq!(engine.rating_of(&id), Some(5));
        assert_eq!(engine.track(&id).unwrap().rating.map(Rating::get), Some(5));
    }

    #[test]
    fn test_shuffle_keeps_membership() {
        let mut engine = engine_with(&["a", "b", "c", "d", "e"]);
        engine.shuffle();
        let mut after = titles(&engine);
        after.sort();
        assert_eq!(after, vec!["a", "b", "c", "d", "e"]);
        engine.verify().unwrap();
    }

    #[test]
    fn test_play_and_undo() {
        let mut engine = engine_with(&["a", "b"]);
        let a = engine.track_at(0).unwrap().id.clone();
        let b = engine.track_at(1).unwrap().id.clone();

        assert!(engine.play_track(&a));
        assert!(engine.play_track(&b));
        assert!(!engine.play_track(&TrackId::from("missing")));

        assert_eq!(engine.last_played().unwrap().id, b);
        assert_eq!(engine.undo_play().unwrap().id, b);
        assert_eq!(engine.undo_play().unwrap().id, a);
        assert!(engine.undo_play().is_none());
    }

    #[test]
    fn test_history_survives_delete() {
        let mut engine = engine_with(&["a"]);
        let id = engine.track_at(0).unwrap().id.clone();
        engine.play_track(&id);
        engine.delete_track(0);
        assert_eq!(engine.history(10)[0].id, id);
        assert!(!engine.play_track(&id));
    }

    #[test]
    fn test_rate_track() {
        let mut engine = engine_with(&["a", "b"]);
        let a = engine.track_at(0).unwrap().id.clone();

        assert!(engine.rate_track(&a, 0).unwrap_err().is_validation());
        assert!(engine.rate_track(&a, 6).unwrap_err().is_validation());
        assert_eq!(engine.rating_of(&a), None);

        assert!(!engine.rate_track(&TrackId::from("missing"), 3).unwrap());
        assert!(engine.rate_track(&a, 3).unwrap());
        assert_eq!(titles_of(&engine.tracks_with_rating(3)), vec!["a"]);

        // Re-rating moves the track between buckets
        assert!(engine.rate_track(&a, 5).unwrap());
        assert!(engine.tracks_with_rating(3).is_empty());
        assert_eq!(titles_of(&engine.tracks_with_rating(5)), vec!["a"]);
        assert!(engine.tracks_with_rating(9).is_empty());
        engine.verify().unwrap();
    }

    #[test]
    fn test_snapshot_contents() {
        let mut engine = Engine::with_config(&Config {
            denylist: crate::config::DenylistConfig {
                artists: vec!["Blocked".into()],
            },
            ..Config::default()
        });
        let a = engine.add_track("a", "x", 100).unwrap();
        let b = engine.add_track("b", "y", 300).unwrap();
        engine.rate_track(&a.id, 2).unwrap();
        engine.play_track(&b.id);

        let snapshot = engine.snapshot();
        assert_eq!(titles_of(&snapshot.tracks), vec!["a", "b"]);
        assert_eq!(snapshot.history[0].id, b.id);
        assert_eq!(snapshot.ratings.get(a.id.as_str()), Some(&2));
        assert_eq!(snapshot.blocked_artists, vec!["blocked"]);
        assert_eq!(snapshot.analytics.total_duration, 400);
        assert_eq!(snapshot.analytics.longest_tracks[0].id, b.id);
        assert_eq!(snapshot.analytics.rating_distribution[&2], 1);
        assert_eq!(snapshot.analytics.total_plays, 1);
        assert_eq!(snapshot.analytics.blocked_artists_count, 1);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("blockedArtists").is_some());
        assert_eq!(json["tracks"][0]["rating"], 2);
    }

    #[test]
    fn test_history_limit_from_config() {
        let mut config = Config::default();
        config.history.max_size = 2;
        let mut engine = Engine::with_config(&config);
        let id = engine.add_track("a", "x", 1).unwrap().id;
        for _ in 0..5 {
            engine.play_track(&id);
        }
        assert_eq!(engine.history(10).len(), 2);
        assert_eq!(engine.listening_patterns().total_plays, 5);
    }

    #[test]
    fn test_search() {
        let mut engine = Engine::new();
        engine.add_track("Hello", "Adele", 295).unwrap();
        engine.add_track("Someone Like You", "Adele", 285).unwrap();
        engine.add_track("Hello World", "Other", 100).unwrap();

        assert_eq!(titles_of(&engine.search("hello"))[0], "Hello");
        assert_eq!(engine.search_by_artist("adele").len(), 2);
        assert_eq!(engine.search_by_title("world").len(), 1);
    }

    #[test]
    fn test_playlist_and_rating_stats() {
        let mut engine = Engine::new();
        assert_eq!(engine.playlist_stats(), PlaylistStats::default());

        let a = engine.add_track("a", "x", 100).unwrap();
        engine.add_track("b", "x", 300).unwrap();
        engine.add_track("c", "x", 50).unwrap();
        engine.rate_track(&a.id, 4).unwrap();

        let stats = engine.playlist_stats();
        assert_eq!(stats.total_duration, 450);
        assert_eq!(stats.average_duration, 150.0);
        assert_eq!(stats.longest.unwrap().title, "b");
        assert_eq!(stats.shortest.unwrap().title, "c");

        let ratings = engine.rating_stats();
        assert_eq!(ratings.total_rated, 1);
        assert_eq!(ratings.average_rating, 4.0);
        assert_eq!(ratings.tree_height, 1);
        assert_eq!(titles_of(&engine.top_rated(3)), vec!["a"]);
    }

    fn titles_of(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.title.as_str()).collect()
    }
}
