//! `TilefrontServer` builder and server loop.
//!
//! This is the entry point for running a Tilefront server. It ties
//! together the layers: transport → lobby registry → game runtime.

use std::path::PathBuf;
use std::sync::Arc;

use tilefront_lobby::{GameRuntime, LobbyRegistry};
use tilefront_maps::MapCatalog;
use tilefront_transport::{Transport, WebSocketConnection, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{ServerConfig, TilefrontError};

/// Shared server state passed to each connection handler task.
///
/// The registry sits behind one mutex so resolving a lobby key is a single
/// check-and-create: two connections naming a fresh key end up in the same
/// lobby.
pub(crate) struct ServerState<R: GameRuntime> {
    pub(crate) lobbies: Mutex<LobbyRegistry<R>>,
}

/// Builder for configuring and starting a Tilefront server.
///
/// # Example
///
/// ```rust,ignore
/// use tilefront::prelude::*;
///
/// let server = TilefrontServerBuilder::new()
///     .bind("0.0.0.0:9000")
///     .maps_dir("maps")
///     .build(MyRuntime::default())
///     .await?;
/// server.run().await
/// ```
pub struct TilefrontServerBuilder {
    config: ServerConfig,
    catalog: Option<MapCatalog>,
}

impl TilefrontServerBuilder {
    /// Creates a new builder with [`ServerConfig::default`] settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            catalog: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the WebSocket upgrade path.
    pub fn ws_path(mut self, path: &str) -> Self {
        self.config.ws_path = path.to_string();
        self
    }

    /// Sets the directory maps are loaded from.
    pub fn maps_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.maps_dir = dir.into();
        self
    }

    /// Serves only the named map from the maps directory.
    pub fn pinned_map(mut self, name: impl Into<String>) -> Self {
        self.config.pinned_map = Some(name.into());
        self
    }

    /// Uses an already loaded catalog instead of reading the maps directory.
    pub fn catalog(mut self, catalog: MapCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Loads the maps, creates the default lobby, and binds the listener.
    ///
    /// Nothing is bound if the maps fail to load.
    ///
    /// # Errors
    /// - [`TilefrontError::Map`] if a map file can't be read or parsed
    /// - [`TilefrontError::Lobby`] if the default lobby has no compatible map
    /// - [`TilefrontError::Transport`] if the address can't be bound
    pub async fn build<R>(self, runtime: R) -> Result<TilefrontServer<R>, TilefrontError>
    where
        R: GameRuntime<Connection = WebSocketConnection>,
    {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => self.config.map_source().load()?,
        };
        tracing::info!(
            maps = catalog.len(),
            player_counts = ?catalog.player_counts(),
            "map catalog ready"
        );

        let default_config = self.config.default_lobby_config(&catalog);
        let registry = LobbyRegistry::new(Arc::new(catalog), Arc::new(runtime), default_config)?;

        let transport = WebSocketTransport::bind(&self.config.bind_addr)
            .await?
            .with_path(self.config.ws_path.clone());

        let state = Arc::new(ServerState {
            lobbies: Mutex::new(registry),
        });

        Ok(TilefrontServer {
            transport,
            state,
            config: self.config,
        })
    }
}

impl Default for TilefrontServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Tilefront server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct TilefrontServer<R: GameRuntime> {
    transport: WebSocketTransport,
    state: Arc<ServerState<R>>,
    config: ServerConfig,
}

impl<R> TilefrontServer<R>
where
    R: GameRuntime<Connection = WebSocketConnection>,
{
    /// Creates a new builder.
    pub fn builder() -> TilefrontServerBuilder {
        TilefrontServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The configuration the server was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Keys of every lobby created so far.
    pub async fn lobby_keys(&self) -> Vec<String> {
        let mut keys = self.state.lobbies.lock().await.keys();
        keys.sort();
        keys
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection; the WebSocket
    /// handshake runs in that task, not here. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), TilefrontError> {
        tracing::info!(
            addr = %self.config.bind_addr,
            path = %self.config.ws_path,
            "Tilefront server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(pending, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
