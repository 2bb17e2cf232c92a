//! Crate-wide error types.
//!
//! Engine operations distinguish three kinds of failure:
//!
//! - [`Error::Validation`]: malformed input, rejected before any mutation
//! - [`Error::Blocked`]: the artist is on the denylist (policy rejection)
//! - not found: never an error, reported as `false` / `None` by the engine
//!
//! The remaining variants belong to the configuration and command-line
//! layers. The binary itself uses `anyhow` on top of these.
//!
//! # Example
//!
//! ```ignore
//! use playwise::error::{Error, Result};
//!
//! fn add(engine: &mut Engine) -> Result<()> {
//!     let track = engine.add_track("Song", "Artist", 180)?;
//!     Ok(())
//! }
//! ```

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before any state change
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Artist is on the denylist
    #[error("Artist \"{artist}\" is blocked")]
    Blocked { artist: String },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed operation script
    #[error("Script error: {0}")]
    Script(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Reasons an engine operation rejects its input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("artist must not be empty")]
    EmptyArtist,

    #[error("duration must be greater than zero")]
    ZeroDuration,

    #[error("rating {0} is outside 1-5")]
    RatingOutOfRange(u8),

    #[error("index {index} is out of range for {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },
}

impl Error {
    /// Create a denylist rejection.
    pub fn blocked(artist: impl Into<String>) -> Self {
        Self::Blocked {
            artist: artist.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for a denylist rejection, looking through any added context.
    pub fn is_blocked(&self) -> bool {
        match self {
            Self::Blocked { .. } => true,
            Self::WithContext { source, .. } => source.is_blocked(),
            _ => false,
        }
    }

    /// True for a validation failure, looking through any added context.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Script(e).context(ctx))
    }
}
