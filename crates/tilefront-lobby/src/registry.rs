//! The lobby registry: lobby key → running lobby.

use std::collections::HashMap;
use std::sync::Arc;

use tilefront_maps::MapCatalog;

use crate::{GameRuntime, Lobby, LobbyConfig, LobbyError};

/// Key of the lobby that always exists.
pub const DEFAULT_LOBBY: &str = "default";

/// Tracks every lobby by key and creates new ones on first use.
///
/// Not thread-safe by itself; the server keeps it behind a mutex so that
/// [`resolve_or_create`](Self::resolve_or_create) is one atomic
/// check-and-create. Lobbies are never removed.
pub struct LobbyRegistry<R: GameRuntime> {
    lobbies: HashMap<String, Arc<Lobby<R>>>,
    catalog: Arc<MapCatalog>,
    runtime: Arc<R>,
}

impl<R: GameRuntime> LobbyRegistry<R> {
    /// Creates a registry holding the [`DEFAULT_LOBBY`], built from
    /// `default_config`.
    ///
    /// # Errors
    /// Fails if the default lobby can't be created, typically because the
    /// catalog has no map for its player count.
    pub fn new(
        catalog: Arc<MapCatalog>,
        runtime: Arc<R>,
        default_config: LobbyConfig,
    ) -> Result<Self, LobbyError> {
        let default = Lobby::spawn(
            DEFAULT_LOBBY,
            default_config,
            &catalog,
            Arc::clone(&runtime),
        )?;
        let mut lobbies = HashMap::new();
        lobbies.insert(DEFAULT_LOBBY.to_string(), default);
        Ok(Self {
            lobbies,
            catalog,
            runtime,
        })
    }

    /// Returns the lobby registered under `key`, creating it if needed.
    ///
    /// An existing lobby is returned as-is: `players` and `options` only
    /// matter when the lobby is new, and are ignored otherwise (even if
    /// `players` is malformed).
    ///
    /// # Errors
    /// On failure nothing is registered.
    /// - [`LobbyError::MalformedPlayers`] / [`LobbyError::InvalidPlayerCount`]
    ///   for a bad `players` hint
    /// - [`LobbyError::NoCompatibleMaps`] if no map seats that many players
    pub fn resolve_or_create(
        &mut self,
        key: &str,
        players: Option<&str>,
        options: &[String],
    ) -> Result<Arc<Lobby<R>>, LobbyError> {
        if let Some(lobby) = self.lobbies.get(key) {
            return Ok(Arc::clone(lobby));
        }

        let config = LobbyConfig::from_hint(players, options)?;
        let lobby = Lobby::spawn(
            key,
            config,
            &self.catalog,
            Arc::clone(&self.runtime),
        )?;
        self.lobbies.insert(key.to_string(), Arc::clone(&lobby));
        Ok(lobby)
    }

    /// Returns the lobby registered under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Arc<Lobby<R>>> {
        self.lobbies.get(key).cloned()
    }

    /// The shared map catalog lobbies draw from.
    pub fn catalog(&self) -> &Arc<MapCatalog> {
        &self.catalog
    }

    /// Lists all registered lobby keys.
    pub fn keys(&self) -> Vec<String> {
        self.lobbies.keys().cloned().collect()
    }

    /// Returns the number of registered lobbies.
    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    /// Always `false` in practice: the default lobby is created up front.
    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }
}
