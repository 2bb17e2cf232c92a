//! Test utilities and fixtures for playwise tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{engine_with, titles};
//!
//! let mut engine = engine_with(&["A", "B", "C"]);
//! engine.reverse();
//! assert_eq!(titles(&engine), vec!["C", "B", "A"]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::catalog::Engine;
use crate::model::Track;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Creates a standalone track with a fresh identity.
///
/// Sequence numbers increase across calls, so fixtures built in order sort
/// in that order by creation.
pub fn track(title: &str, artist: &str, duration: u32) -> Track {
    Track::new(title, artist, duration, SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Creates an engine holding one track per title, in order.
///
/// Every track is by "Test Artist" and lasts 180 seconds.
pub fn engine_with(titles: &[&str]) -> Engine {
    let mut engine = Engine::new();
    for title in titles {
        engine
            .add_track(title, "Test Artist", 180)
            .expect("Failed to add fixture track");
    }
    engine
}

/// Titles in playlist order.
pub fn titles(engine: &Engine) -> Vec<String> {
    engine.tracks().into_iter().map(|t| t.title).collect()
}
