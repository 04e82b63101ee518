//! The hand-off seam between lobbies and the game-session layer.

use std::fmt;
use std::sync::Arc;

use tilefront_maps::Playfield;
use tilefront_transport::Connection;

use crate::Player;

/// Identifies a game instance within its lobby.
///
/// Ids are handed out by each lobby starting at 0, strictly increasing,
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// A full game instance, ready to be played.
///
/// Produced by a lobby's spawner once it has seated the target number of
/// players. Ownership of the players (and their connections) moves to the
/// runtime; the lobby never touches the instance again.
pub struct GameInstance<R: GameRuntime> {
    /// Instance id, unique within `lobby`.
    pub id: GameId,
    /// Key of the lobby that spawned this instance.
    pub lobby: String,
    /// Seated players in arrival order.
    pub players: Vec<Player<R>>,
    /// The map, drawn at random from the lobby's compatible maps.
    pub map: Arc<Playfield>,
    /// The lobby's option flags.
    pub options: Arc<[String]>,
}

/// The game-session layer: whatever drives a game once it is full.
///
/// Lobbies call [`start`](Self::start) from their spawner task, so it must
/// return promptly. Spawn a task to run the game.
pub trait GameRuntime: Sized + Send + Sync + 'static {
    /// The connection type players arrive on.
    type Connection: Connection;

    /// Per-player in-game state. Created empty when a player connects and
    /// filled in by the runtime after hand-off.
    type PlayerState: Default + Send + 'static;

    /// Takes ownership of a full game instance.
    fn start(&self, game: GameInstance<Self>);
}
