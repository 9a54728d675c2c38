//! Registry of live sessions.

use crate::session::{Session, SessionState};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Process-wide collection of active sessions, keyed by session ID.
///
/// Connection tasks add and remove entries concurrently with broadcasts, so
/// the map sits behind a single lock.
pub struct Registry {
    sessions: RwLock<HashMap<u64, Arc<Session>>>,
    next_id: AtomicU64,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocates a fresh session ID.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Creates and registers a new session, returning it with the receiving
    /// end of its outbound queue.
    pub fn create_session(
        &self,
        peer_addr: SocketAddr,
    ) -> (Arc<Session>, mpsc::UnboundedReceiver<Bytes>) {
        let (session, rx) = Session::channel(self.next_id(), peer_addr);
        let session = Arc::new(session);
        self.add(Arc::clone(&session));
        (session, rx)
    }

    /// Adds a session. Returns the session previously stored under the same
    /// ID, if any.
    pub fn add(&self, session: Arc<Session>) -> Option<Arc<Session>> {
        self.sessions.write().insert(session.id(), session)
    }

    /// Removes a session. Removing an ID that is not present is a no-op.
    pub fn remove(&self, session_id: u64) -> Option<Arc<Session>> {
        self.sessions.write().remove(&session_id)
    }

    /// Gets a session by ID.
    #[must_use]
    pub fn get(&self, session_id: u64) -> Option<Arc<Session>> {
        self.sessions.read().get(&session_id).cloned()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns all session IDs.
    #[must_use]
    pub fn ids(&self) -> Vec<u64> {
        self.sessions.read().keys().copied().collect()
    }

    /// Iterates over all sessions.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Session),
    {
        for session in self.sessions.read().values() {
            f(session);
        }
    }

    /// Writes `frame` to every session in [`SessionState::Ready`].
    ///
    /// Sessions in any other state are skipped. A failed write is logged and
    /// does not stop delivery to the remaining sessions.
    ///
    /// # Returns
    /// The number of sessions the frame was queued for.
    pub fn broadcast(&self, frame: &Bytes) -> usize {
        let targets: Vec<Arc<Session>> = self
            .sessions
            .read()
            .values()
            .filter(|s| s.state() == SessionState::Ready)
            .cloned()
            .collect();

        let mut delivered = 0;
        for session in targets {
            match session.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Broadcast to session {} failed: {}", session.id(), e);
                }
            }
        }
        delivered
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
