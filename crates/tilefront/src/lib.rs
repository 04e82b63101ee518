//! # Tilefront
//!
//! Lobby and matchmaking server for tile-based multiplayer strategy games.
//!
//! Clients open a WebSocket on the upgrade path, naming the lobby they want
//! with `?custom=<key>` (plus `players=<n>` and repeated `option=<v>` when
//! that lobby is new). Each lobby seats players in arrival order and, once
//! a game is full, hands it to a [`GameRuntime`] together with a map drawn
//! from the catalog for that player count.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tilefront::prelude::*;
//!
//! // Implement GameRuntime for your game, then:
//! // let server = TilefrontServerBuilder::new()
//! //     .bind("0.0.0.0:9000")
//! //     .maps_dir("maps")
//! //     .build(MyRuntime)
//! //     .await?;
//! // server.run().await
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{ServerConfig, DEFAULT_BIND_ADDR, DEFAULT_MAPS_DIR, DEFAULT_WS_PATH};
pub use error::TilefrontError;
pub use server::{TilefrontServer, TilefrontServerBuilder};

pub use tilefront_lobby::{
    ConnectParams, GameId, GameInstance, GameRuntime, Lobby, LobbyConfig, LobbyError,
    LobbyRegistry, Player, PlayerId, DEFAULT_LOBBY, DEFAULT_PLAYERS,
};
pub use tilefront_maps::{MapCatalog, MapError, MapSource, Playfield};
pub use tilefront_transport::{
    Connection, ConnectionId, TransportError, WebSocketConnection, WebSocketUpgrade,
};

/// Everything needed to implement a runtime and start a server.
pub mod prelude {
    pub use crate::{
        Connection, GameId, GameInstance, GameRuntime, MapCatalog, Player, PlayerId,
        Playfield, ServerConfig, TilefrontError, TilefrontServer, TilefrontServerBuilder,
        WebSocketConnection,
    };
}
