//! Server configuration.

use std::path::PathBuf;

use tilefront_lobby::{LobbyConfig, DEFAULT_PLAYERS};
use tilefront_maps::{MapCatalog, MapSource};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";

/// Default path clients upgrade to a WebSocket on.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Default maps directory, relative to the working directory.
pub const DEFAULT_MAPS_DIR: &str = "maps";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub bind_addr: String,
    /// Upgrade path; connections on any other path are refused.
    pub ws_path: String,
    /// Directory holding the map files.
    pub maps_dir: PathBuf,
    /// Serve only this map (a file name inside `maps_dir`).
    pub pinned_map: Option<String>,
    /// Player count of the `"default"` lobby.
    pub default_players: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            ws_path: DEFAULT_WS_PATH.to_string(),
            maps_dir: PathBuf::from(DEFAULT_MAPS_DIR),
            pinned_map: None,
            default_players: DEFAULT_PLAYERS,
        }
    }
}

impl ServerConfig {
    /// Where the map catalog should be loaded from.
    pub fn map_source(&self) -> MapSource {
        match &self.pinned_map {
            Some(name) => MapSource::Pinned(self.maps_dir.join(name)),
            None => MapSource::Directory(self.maps_dir.clone()),
        }
    }

    /// Config for the `"default"` lobby given the loaded catalog.
    ///
    /// Uses `default_players`, unless the catalog has no map for it but
    /// serves exactly one player count (a pinned map), in which case the
    /// default lobby takes that count.
    pub fn default_lobby_config(&self, catalog: &MapCatalog) -> LobbyConfig {
        let mut target_players = self.default_players;
        if catalog.lookup(target_players).is_empty() {
            if let [only] = catalog.player_counts()[..] {
                tracing::warn!(
                    wanted = target_players,
                    using = only,
                    "no map for the default lobby size, using the only size available"
                );
                target_players = only;
            }
        }
        LobbyConfig {
            target_players,
            options: Vec::new(),
        }
    }
}
