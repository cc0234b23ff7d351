//! Live connection registry with identity-excluding broadcast.
//!
//! [`ConnectionRegistry`] keeps two indexes over the open connections: an
//! identity-keyed map of ordered buckets and a reverse map from
//! [`ConnectionId`] to the owning identity. Both live behind one
//! [`tokio::sync::Mutex`] so every logical mutation updates them together.
//!
//! # Connection lifecycle
//!
//! ```text
//! Pending ──(handshake ok, connect)──▶ Open ──(disconnect / eviction)──▶ Closed
//! ```
//!
//! `Pending` is owned by the transport layer. A `Closed` connection is gone
//! from both indexes and never shows up in a later broadcast snapshot.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::transport::Transport;
use super::{ConnectionId, UserId};

/// One registered connection as seen by the reverse index.
struct Registered<T> {
    identity: Option<UserId>,
    transport: Arc<T>,
}

/// Both indexes, always mutated under the same lock.
struct RegistryState<T> {
    /// `None` is the bucket for anonymous connections.
    by_identity: BTreeMap<Option<UserId>, Vec<ConnectionId>>,
    connections: HashMap<ConnectionId, Registered<T>>,
}

impl<T> RegistryState<T> {
    fn new() -> Self {
        Self {
            by_identity: BTreeMap::new(),
            connections: HashMap::new(),
        }
    }

    fn insert(&mut self, id: ConnectionId, identity: Option<UserId>, transport: T) {
        self.by_identity.entry(identity).or_default().push(id);
        self.connections.insert(
            id,
            Registered {
                identity,
                transport: Arc::new(transport),
            },
        );
    }

    /// Removes `id` from both indexes. Returns the identity it was registered
    /// under, or `None` if it was not registered.
    fn remove(&mut self, id: ConnectionId) -> Option<Option<UserId>> {
        let entry = self.connections.remove(&id)?;
        if let Some(bucket) = self.by_identity.get_mut(&entry.identity) {
            bucket.retain(|c| *c != id);
            if bucket.is_empty() {
                self.by_identity.remove(&entry.identity);
            }
        }
        Some(entry.identity)
    }

    /// Flattens the registry in bucket order: anonymous first, then
    /// ascending identity, insertion order within a bucket.
    fn snapshot(&self) -> Vec<(ConnectionId, Option<UserId>, Arc<T>)> {
        self.by_identity
            .values()
            .flatten()
            .filter_map(|id| {
                self.connections
                    .get(id)
                    .map(|entry| (*id, entry.identity, Arc::clone(&entry.transport)))
            })
            .collect()
    }
}

/// Registry of open client connections keyed by optional user identity.
///
/// Constructed once at startup and shared through `Arc` with every handler
/// that connects sockets or emits notifications.
///
/// # Concurrency
///
/// - `connect`, `disconnect` and the eviction step of `broadcast` each hold
///   the lock for a single critical section.
/// - `broadcast` releases the lock before sending, so a slow peer never
///   blocks connects or disconnects.
/// - `disconnect` is idempotent; the receive loop and broadcast eviction may
///   both remove the same connection.
pub struct ConnectionRegistry<T> {
    state: Mutex<RegistryState<T>>,
}

impl<T> fmt::Debug for ConnectionRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry").finish_non_exhaustive()
    }
}

impl<T: Transport> ConnectionRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::new()),
        }
    }

    /// Registers an open connection under `identity` (`None` = anonymous).
    ///
    /// The transport handshake must already be complete. Returns the id to
    /// pass to [`Self::disconnect`].
    pub async fn connect(&self, transport: T, identity: Option<UserId>) -> ConnectionId {
        let id = ConnectionId::new();
        let peer = transport.peer();

        let mut state = self.state.lock().await;
        state.insert(id, identity, transport);
        let total = state.connections.len();
        drop(state);

        tracing::info!(connection_id = %id, user_id = ?identity, %peer, total, "websocket connected");
        id
    }

    /// Removes a connection from the registry.
    ///
    /// Unknown or already removed ids are a no-op. Returns `true` if this
    /// call removed the connection.
    pub async fn disconnect(&self, id: ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        let removed = state.remove(id);
        let total = state.connections.len();
        drop(state);

        match removed {
            Some(identity) => {
                tracing::info!(connection_id = %id, user_id = ?identity, total, "websocket disconnected");
                true
            }
            None => {
                tracing::debug!(connection_id = %id, "disconnect of unregistered connection ignored");
                false
            }
        }
    }

    /// Sends `payload` verbatim to every connection not owned by `exclude`.
    ///
    /// With `exclude = None` every connection, anonymous ones included,
    /// receives the payload. Delivery is best-effort: a failed send is logged
    /// and the connection is evicted and closed once the whole snapshot has
    /// been attempted, so one dead peer never stops delivery to the rest.
    pub async fn broadcast(&self, payload: &str, exclude: Option<UserId>) {
        let recipients = self.state.lock().await.snapshot();
        tracing::info!(
            connections = recipients.len(),
            sender = ?exclude,
            "broadcasting notification"
        );

        let mut failed = Vec::new();
        for (id, identity, transport) in recipients {
            if exclude.is_some() && identity == exclude {
                continue;
            }
            match transport.send(payload).await {
                Ok(()) => {
                    tracing::debug!(connection_id = %id, user_id = ?identity, "notification sent");
                }
                Err(err) => {
                    tracing::warn!(
                        connection_id = %id,
                        user_id = ?identity,
                        peer = %transport.peer(),
                        error = %err,
                        "send failed, evicting connection"
                    );
                    failed.push((id, transport));
                }
            }
        }

        for (id, transport) in failed {
            self.disconnect(id).await;
            transport.close().await;
        }
    }

    /// Returns the number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    /// Returns `true` if at least one connection is registered under
    /// `identity`.
    pub async fn contains_identity(&self, identity: Option<UserId>) -> bool {
        self.state.lock().await.by_identity.contains_key(&identity)
    }

    /// Returns the number of connections registered under `identity`.
    pub async fn identity_connection_count(&self, identity: Option<UserId>) -> usize {
        self.state
            .lock()
            .await
            .by_identity
            .get(&identity)
            .map_or(0, Vec::len)
    }
}

impl<T: Transport> Default for ConnectionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
