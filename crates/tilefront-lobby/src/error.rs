//! Error types for the lobby layer.

/// Errors that can occur while resolving lobbies or admitting players.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The `players` parameter was not a non-negative integer.
    #[error("\"players\" is not a number: {0:?}")]
    MalformedPlayers(String),

    /// A lobby needs at least one seat.
    #[error("a lobby needs at least one player, got {0}")]
    InvalidPlayerCount(usize),

    /// No loaded map seats this many players, so a game could never start.
    #[error("no map supports {0} players")]
    NoCompatibleMaps(usize),

    /// The lobby's spawner is gone and it no longer takes players.
    #[error("lobby {0:?} is closed")]
    Closed(String),
}
