//! Connection registry for admin notification streams.
//!
//! The registry is the only piece of shared mutable state in the
//! notification pipeline. It maps each open stream's [`ConnectionId`] to a
//! [`Connection`] handle that accepts serialized frames.
//!
//! ```text
//! ConnectionRegistry
//! ├── conn-a ──► mpsc ──► SSE response (admin tab 1)
//! ├── conn-b ──► mpsc ──► SSE response (admin tab 2)
//! └── conn-c ──► mpsc ──► SSE response (admin laptop)
//! ```
//!
//! # Ownership
//!
//! The streaming response owns its connection (through a drop guard). The
//! registry only keeps a shared handle for fan-out and never closes a
//! connection on its own; it drops a handle when the stream goes away or
//! when a write reports the receiving side is gone.
//!
//! # Thread Safety
//!
//! Membership lives behind a `std::sync::RwLock`. No lock is ever held across
//! an `.await`, which lets the response stream's `Drop` unregister
//! synchronously. Fan-out iterates a snapshot, so concurrent
//! register/unregister calls never disturb a broadcast in progress.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::foundation::{ConnectionId, Timestamp, UserId};

/// Serialized envelope JSON, shared between all recipients of one broadcast.
pub type Frame = Arc<str>;

/// Why a frame could not be handed to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The receiving stream is gone; the connection is dead.
    #[error("connection closed")]
    Closed,

    /// The connection's buffer is full; the frame was dropped for it.
    #[error("connection buffer full")]
    Full,
}

/// One open notification stream.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    principal: Option<UserId>,
    opened_at: Timestamp,
    tx: mpsc::Sender<Frame>,
    open: AtomicBool,
    dropped_frames: AtomicU64,
}

impl Connection {
    /// Creates a connection with a bounded outbound buffer.
    ///
    /// Returns the shared handle and the receiver that feeds the response
    /// stream. A capacity of zero is raised to one.
    pub fn open(principal: Option<UserId>, capacity: usize) -> (Arc<Self>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let connection = Arc::new(Self {
            id: ConnectionId::new(),
            principal,
            opened_at: Timestamp::now(),
            tx,
            open: AtomicBool::new(true),
            dropped_frames: AtomicU64::new(0),
        });
        (connection, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Admin identity behind the stream; `None` under the development bypass.
    pub fn principal(&self) -> Option<&UserId> {
        self.principal.as_ref()
    }

    pub fn opened_at(&self) -> &Timestamp {
        &self.opened_at
    }

    /// True until the connection is closed or its receiver is dropped.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    /// Number of frames dropped because the buffer was full.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames.load(Ordering::Relaxed)
    }

    /// Enqueues a frame without waiting.
    ///
    /// A full buffer drops the frame for this connection only. A dropped
    /// receiver marks the connection closed.
    pub fn deliver(&self, frame: Frame) -> Result<(), DeliveryError> {
        if !self.open.load(Ordering::Acquire) {
            return Err(DeliveryError::Closed);
        }

        match self.tx.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped_frames.fetch_add(1, Ordering::Relaxed);
                Err(DeliveryError::Full)
            }
            Err(TrySendError::Closed(_)) => {
                self.close();
                Err(DeliveryError::Closed)
            }
        }
    }

    /// Marks the connection closed.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// concurrent closers (transport abort racing a failed write) agree on a
    /// single owner of the cleanup log line.
    pub fn close(&self) -> bool {
        self.open.swap(false, Ordering::AcqRel)
    }
}

/// Process-wide set of live notification connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<Connection>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. Registering the same connection again is a no-op
    /// for fan-out purposes (membership is keyed by id).
    pub fn register(&self, connection: Arc<Connection>) {
        let id = connection.id();
        let total = {
            let mut connections = self.write();
            connections.insert(id, connection);
            connections.len()
        };
        tracing::debug!(connection_id = %id, total, "Notification connection registered");
    }

    /// Removes a connection if present. Returns whether it was a member.
    pub fn unregister(&self, id: &ConnectionId) -> bool {
        let (removed, total) = {
            let mut connections = self.write();
            let removed = connections.remove(id).is_some();
            (removed, connections.len())
        };
        if removed {
            tracing::debug!(connection_id = %id, total, "Notification connection unregistered");
        }
        removed
    }

    /// Point-in-time copy of the membership for fan-out.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        self.read().values().cloned().collect()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated
    // (insert/remove are single calls), so poisoning is safe to ignore.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ConnectionId, Arc<Connection>>> {
        self.connections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ConnectionId, Arc<Connection>>> {
        self.connections.write().unwrap_or_else(PoisonError::into_inner)
    }
}
