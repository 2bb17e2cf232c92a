//! Engine handle for hosts with parallel callers.
//!
//! One coarse lock guards the whole engine: any number of readers, or a
//! single writer. Each closure runs as one critical section, so callers never
//! observe an operation half-applied.

use parking_lot::RwLock;
use std::sync::Arc;

use super::engine::Engine;
use super::snapshot::Snapshot;
use crate::config::Config;

/// Cloneable, thread-safe handle to one [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Self::new(Engine::with_config(config))
    }

    /// Run a read-only operation. May run alongside other readers.
    pub fn read<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a mutating operation with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read(Engine::snapshot)
    }
}

impl From<Engine> for SharedEngine {
    fn from(engine: Engine) -> Self {
        Self::new(engine)
    }
}
