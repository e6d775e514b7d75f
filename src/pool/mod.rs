//! The bounded set of live connections.
//!
//! Admission and removal are serialized by a single mutex so the
//! `len <= capacity` invariant holds at every point a caller can
//! observe. Membership is tracked by handle identity, never by peer
//! address equality.

use std::collections::HashSet;
use std::sync::Mutex;

use tokio::net::TcpStream;

/// Identity of one admitted connection. Ids are monotonic and never
/// reused, which makes a duplicate reclaim signal detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

/// Pushed by a worker when it is done with its connection. Ownership of
/// the socket transfers to the reclaimer here; the worker must not
/// touch it afterward.
#[derive(Debug)]
pub struct ReclaimSignal {
    pub id: ConnId,
    pub stream: TcpStream,
}

#[derive(Debug)]
pub struct ConnectionPool {
    capacity: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    live: HashSet<ConnId>,
    next_id: u64,
}

impl ConnectionPool {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be positive");
        Self { capacity, inner: Mutex::new(Inner { live: HashSet::with_capacity(capacity), next_id: 0 }) }
    }

    /// Admits one connection, handing back its tracking handle, or
    /// `None` when the pool is at capacity. A rejected caller must close
    /// the raw socket itself and must not spawn a worker for it.
    pub fn admit(&self) -> Option<ConnId> {
        let mut inner = self.inner.lock().expect("connection pool lock poisoned");

        if inner.live.len() >= self.capacity {
            return None;
        }

        let id = ConnId(inner.next_id);
        inner.next_id += 1;
        inner.live.insert(id);
        Some(id)
    }

    /// Drops a handle from the tracked set. Removing an unknown handle
    /// is a no-op returning false, which guards against duplicate
    /// reclaim signals.
    pub fn remove(&self, id: ConnId) -> bool {
        let mut inner = self.inner.lock().expect("connection pool lock poisoned");
        inner.live.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("connection pool lock poisoned").live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
