//! PlayWise - an in-memory music catalog engine.
//!
//! Tracks live in a registry keyed by id. The engine keeps an ordered
//! playlist, a rating index, a bounded play history and an artist denylist
//! in step with that registry. A small CLI replays JSON operation scripts
//! against a fresh engine.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
#[cfg(test)]
pub mod test_utils;
