//! Read-only, point-in-time views of the engine.

use crate::model::Track;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything a collaborator needs to render the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Tracks in playlist order
    pub tracks: Vec<Track>,
    /// Recent plays, most recent first
    pub history: Vec<Track>,
    /// Identity -> rating
    pub ratings: BTreeMap<String, u8>,
    /// Normalized names, sorted
    pub blocked_artists: Vec<String>,
    pub analytics: Analytics,
}

/// Dashboard figures derived from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_tracks: usize,
    /// Seconds
    pub total_duration: u64,
    /// Longest first
    pub longest_tracks: Vec<Track>,
    /// Rating (1-5) -> number of tracks
    pub rating_distribution: BTreeMap<u8, usize>,
    pub total_plays: u64,
    pub blocked_artists_count: usize,
}

/// Playlist length statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStats {
    pub total_tracks: usize,
    pub total_duration: u64,
    pub average_duration: f64,
    pub longest: Option<Track>,
    pub shortest: Option<Track>,
}

/// Rating index statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total_rated: usize,
    pub average_rating: f64,
    pub distribution: BTreeMap<u8, usize>,
    pub tree_height: usize,
}
