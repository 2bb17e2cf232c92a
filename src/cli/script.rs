//! JSON operations and responses exchanged with the command line.
//!
//! Each input line or array element is one [`Request`], tagged by `op`:
//!
//! ```json
//! {"op": "add", "title": "Hello", "artist": "Adele", "duration": 295}
//! {"op": "move", "from": 0, "to": 2}
//! {"op": "rate", "index": 0, "rating": 5}
//! ```
//!
//! Engine outcomes are mapped to a [`Response`] whose `status` tells the
//! caller which kind of failure, if any, occurred.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::catalog::{Engine, SortCriterion, SortDirection};
use crate::error::Error;
use crate::model::TrackId;

fn default_limit() -> usize {
    10
}

/// One engine operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Add {
        title: String,
        artist: String,
        duration: u32,
        /// Insert position; appends when absent
        #[serde(default)]
        index: Option<usize>,
    },
    Delete {
        index: usize,
    },
    Move {
        from: usize,
        to: usize,
    },
    Reverse,
    Sort {
        #[serde(default)]
        criterion: SortCriterion,
        #[serde(default)]
        direction: SortDirection,
    },
    Shuffle,
    /// Record a play of the track given by `id` or playlist `index`
    Play {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        index: Option<usize>,
    },
    Rate {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        index: Option<usize>,
        rating: u8,
    },
    Undo,
    Block {
        artist: String,
    },
    Unblock {
        artist: String,
    },
    Search {
        query: String,
    },
    ByRating {
        rating: u8,
    },
    History {
        #[serde(default = "default_limit")]
        limit: usize,
    },
    Stats,
    Snapshot,
}

/// Outcome of one [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
    /// Policy rejection (blocked artist)
    Rejected { message: String },
    /// Malformed input
    Invalid { message: String },
    NotFound { message: String },
}

impl Response {
    fn ok() -> Self {
        Response::Ok { data: None }
    }

    fn data(value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(data) => Response::Ok { data: Some(data) },
            Err(e) => Response::Invalid {
                message: e.to_string(),
            },
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Response::NotFound {
            message: message.into(),
        }
    }

    fn from_bool(done: bool, missing: &str) -> Self {
        if done { Self::ok() } else { Self::not_found(missing) }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }
}

impl From<Error> for Response {
    fn from(e: Error) -> Self {
        if e.is_blocked() {
            Response::Rejected {
                message: e.to_string(),
            }
        } else {
            Response::Invalid {
                message: e.to_string(),
            }
        }
    }
}

/// Parse one request from JSON text.
pub fn parse(line: &str) -> crate::error::Result<Request> {
    Ok(serde_json::from_str(line)?)
}

/// Parse a JSON array of requests.
pub fn parse_script(text: &str) -> crate::error::Result<Vec<Request>> {
    Ok(serde_json::from_str(text)?)
}

/// Apply one request to the engine.
pub fn apply(engine: &mut Engine, request: Request) -> Response {
    match request {
        Request::Add {
            title,
            artist,
            duration,
            index,
        } => {
            let result = match index {
                Some(index) => engine.insert_track_at(index, &title, &artist, duration),
                None => engine.add_track(&title, &artist, duration),
            };
            match result {
                Ok(track) => Response::data(track),
                Err(e) => e.into(),
            }
        }
        Request::Delete { index } => match engine.delete_track(index) {
            Some(track) => Response::data(track),
            None => Response::not_found(format!("no track at index {index}")),
        },
        Request::Move { from, to } => {
            Response::from_bool(engine.move_track(from, to), "invalid indices")
        }
        Request::Reverse => {
            engine.reverse();
            Response::ok()
        }
        Request::Sort {
            criterion,
            direction,
        } => {
            engine.sort(criterion, direction);
            Response::ok()
        }
        Request::Shuffle => {
            engine.shuffle();
            Response::ok()
        }
        Request::Play { id, index } => match resolve(engine, id, index) {
            Some(id) => Response::from_bool(engine.play_track(&id), "track not found"),
            None => Response::not_found("track not found"),
        },
        Request::Rate { id, index, rating } => match resolve(engine, id, index) {
            Some(id) => match engine.rate_track(&id, rating) {
                Ok(done) => Response::from_bool(done, "track not found"),
                Err(e) => e.into(),
            },
            None => Response::not_found("track not found"),
        },
        Request::Undo => match engine.undo_play() {
            Some(track) => Response::data(track),
            None => Response::not_found("no plays to undo"),
        },
        Request::Block { artist } => {
            let added = engine.block_artist(&artist);
            Response::data(json!({ "added": added }))
        }
        Request::Unblock { artist } => {
            let removed = engine.unblock_artist(&artist);
            Response::data(json!({ "removed": removed }))
        }
        Request::Search { query } => Response::data(engine.search(&query)),
        Request::ByRating { rating } => {
            if !(1..=5).contains(&rating) {
                return Response::Invalid {
                    message: format!("rating {rating} is outside 1-5"),
                };
            }
            Response::data(engine.tracks_with_rating(rating))
        }
        Request::History { limit } => Response::data(engine.history(limit)),
        Request::Stats => Response::data(json!({
            "playlist": engine.playlist_stats(),
            "ratings": engine.rating_stats(),
            "listening": engine.listening_patterns(),
            "mostPlayed": engine.most_played(5),
            "recentArtists": engine.recent_artists(5),
        })),
        Request::Snapshot => Response::data(engine.snapshot()),
    }
}

/// An explicit id wins over an index.
fn resolve(engine: &Engine, id: Option<String>, index: Option<usize>) -> Option<TrackId> {
    match (id, index) {
        (Some(id), _) => Some(TrackId::from(id)),
        (None, Some(index)) => engine.track_at(index).map(|t| t.id.clone()),
        (None, None) => None,
    }
}
