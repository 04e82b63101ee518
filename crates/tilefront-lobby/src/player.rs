//! Player handles.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tilefront_transport::{Connection, ConnectionId};
use tokio::sync::mpsc;

use crate::GameRuntime;

/// Counter for generating unique player IDs.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Feeds frames received on a player's connection into its handle.
pub type InboundSender = mpsc::UnboundedSender<Vec<u8>>;

/// One connected player.
///
/// Created when a connection is admitted, moved into exactly one lobby's
/// intake and from there into exactly one [`GameInstance`](crate::GameInstance).
/// Incoming frames are delivered through [`recv`](Self::recv); they are
/// buffered from the moment the player connects, so nothing sent while
/// waiting for a seat is lost.
pub struct Player<R: GameRuntime> {
    id: PlayerId,
    connection: Arc<R::Connection>,
    inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    /// In-game state, owned by the runtime after hand-off.
    pub state: R::PlayerState,
}

impl<R: GameRuntime> Player<R> {
    /// Creates a player with empty state, returning the sender the
    /// connection's receive loop should forward frames into.
    pub fn new(connection: Arc<R::Connection>) -> (Self, InboundSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let player = Self {
            id: PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed)),
            connection,
            inbound: rx,
            state: R::PlayerState::default(),
        };
        (player, tx)
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// The player's connection, for sending.
    pub fn connection(&self) -> &Arc<R::Connection> {
        &self.connection
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection.id()
    }

    /// Waits for the next frame from this player.
    ///
    /// Returns `None` once the connection has closed and every buffered
    /// frame has been read.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.inbound.recv().await
    }

    /// Returns a buffered frame without waiting, if there is one.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.inbound.try_recv().ok()
    }
}

impl<R: GameRuntime> fmt::Debug for Player<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("connection", &self.connection.id())
            .finish_non_exhaustive()
    }
}
