//! Lobby configuration.

use crate::LobbyError;

/// Player count used when a connection doesn't ask for one.
pub const DEFAULT_PLAYERS: usize = 2;

/// Settings fixed when a lobby is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyConfig {
    /// How many players each game instance seats.
    pub target_players: usize,

    /// Opaque flags passed through to the game runtime, in request order.
    pub options: Vec<String>,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            target_players: DEFAULT_PLAYERS,
            options: Vec::new(),
        }
    }
}

impl LobbyConfig {
    /// Builds a config from the raw `players` hint and options of a request.
    ///
    /// A missing or empty hint means [`DEFAULT_PLAYERS`].
    ///
    /// # Errors
    /// - [`LobbyError::MalformedPlayers`] if the hint isn't a non-negative integer
    /// - [`LobbyError::InvalidPlayerCount`] if the hint is zero
    pub fn from_hint(
        players: Option<&str>,
        options: &[String],
    ) -> Result<Self, LobbyError> {
        let target_players = match players {
            None | Some("") => DEFAULT_PLAYERS,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| LobbyError::MalformedPlayers(raw.to_string()))?,
        };
        if target_players == 0 {
            return Err(LobbyError::InvalidPlayerCount(target_players));
        }
        Ok(Self {
            target_players,
            options: options.to_vec(),
        })
    }
}
