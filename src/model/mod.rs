//! Core data model: [`Track`], its identity and its rating.
//!
//! A track is owned by the registry. Every other structure refers to it by
//! [`TrackId`], except the play history which keeps owned snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Opaque unique track identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A star rating in `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Returns `None` when `value` is outside 1-5.
    pub fn new(value: u8) -> Option<Self> {
        (MIN_RATING..=MAX_RATING)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A track in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique identity, fixed at creation
    pub id: TrackId,
    /// Title, trimmed
    pub title: String,
    /// Artist, trimmed
    pub artist: String,
    /// Duration in seconds
    pub duration: u32,
    /// Current rating, if the track was ever rated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Monotonic creation counter; orders tracks created within the same instant
    #[serde(skip)]
    pub sequence: u64,
}

impl Track {
    /// Build a track with a fresh identity.
    ///
    /// Performs no validation; the engine checks its inputs first.
    pub fn new(title: &str, artist: &str, duration: u32, sequence: u64) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.trim().to_string(),
            artist: artist.trim().to_string(),
            duration,
            rating: None,
            created_at: Utc::now(),
            sequence,
        }
    }

    /// Lower-cased, trimmed title used for ordering and search.
    pub fn title_key(&self) -> String {
        normalize(&self.title)
    }

    /// Lower-cased, trimmed artist used for ordering, search and the denylist.
    pub fn artist_key(&self) -> String {
        normalize(&self.artist)
    }

    /// Format duration as MM:SS.
    pub fn duration_str(&self) -> String {
        format!("{}:{:02}", self.duration / 60, self.duration % 60)
    }
}

/// Case-normalize a name the way every index in the catalog compares names.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_none());
        assert_eq!(Rating::new(1).map(Rating::get), Some(1));
        assert_eq!(Rating::new(5).map(Rating::get), Some(5));
        assert!(Rating::new(6).is_none());
    }

    #[test]
    fn test_track_trims_fields() {
        let track = Track::new("  Hello ", " Adele", 295, 0);
        assert_eq!(track.title, "Hello");
        assert_eq!(track.artist, "Adele");
        assert_eq!(track.duration_str(), "4:55");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Track::new("a", "b", 1, 0);
        let b = Track::new("a", "b", 1, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_track_serialization_shape() {
        let mut track = Track::new("Song", "Artist", 200, 3);
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("id").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("rating").is_none());
        assert!(json.get("sequence").is_none());

        track.rating = Rating::new(4);
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["rating"], 4);
        assert_eq!(json["duration"], 200);
    }
}
