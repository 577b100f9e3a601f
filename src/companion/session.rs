use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Subject of the most recent verified local reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    CreatedFile,
    AvatarAdvancement,
}

/// Process-local record of the last local action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Always a file this process wrote itself.
    pub last_created_path: Option<PathBuf>,
    pub last_created_at: Option<DateTime<Utc>>,
    /// Used only to disambiguate "i meant yours".
    pub last_topic: Option<Topic>,
}

/// Single-writer / multi-reader holder for [`SessionState`].
///
/// Only the executor writes. Readers take a cloned snapshot so the classifier
/// never observes a half-applied update.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Record a file written at `at`. A write older than the one already
    /// recorded is ignored so racing creations keep recency order.
    pub(crate) fn record_created(&self, path: &Path, at: DateTime<Utc>) {
        let mut state = self.lock();
        if state.last_created_at.is_some_and(|prev| prev > at) {
            return;
        }
        state.last_created_path = Some(path.to_path_buf());
        state.last_created_at = Some(at);
        state.last_topic = Some(Topic::CreatedFile);
    }

    pub(crate) fn record_topic(&self, topic: Topic) {
        self.lock().last_topic = Some(topic);
    }
}
