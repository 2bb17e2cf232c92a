//! In-memory media catalog engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Collaborator (CLI, HTTP, UI)                 │
//! └────────────────────────────┬────────────────────────────────────┘
//!                              │ Engine methods (one transaction each)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Engine                               │
//! │   validates against Denylist / Registry, then mutates together  │
//! └──────┬──────────────┬──────────────┬──────────────┬─────────────┘
//!        ▼              ▼              ▼              ▼
//!    Registry       Playlist      RatingIndex     PlayHistory
//!  (id -> Track)   (linked ids)  (BST of ids)   (Track copies)
//! ```
//!
//! Only the registry owns tracks. Playlist and rating index refer to them by
//! [`TrackId`](crate::model::TrackId); the history keeps snapshots so a play
//! survives deletion of its track.

pub mod denylist;
pub mod engine;
pub mod history;
pub mod playlist;
pub mod ratings;
pub mod registry;
mod shared;
pub mod snapshot;
pub mod sorter;

pub use denylist::Denylist;
pub use engine::{Engine, Inconsistency};
pub use history::PlayHistory;
pub use playlist::Playlist;
pub use ratings::RatingIndex;
pub use registry::Registry;
pub use shared::SharedEngine;
pub use snapshot::{Analytics, PlaylistStats, RatingStats, Snapshot};
pub use sorter::{SortCriterion, SortDirection};
