//! Lobbies and game spawning for Tilefront.
//!
//! Players arrive with a lobby key (the `custom` query parameter). Each
//! lobby runs one spawner task (actor model) that seats arriving players,
//! in arrival order, into a game instance until it holds the lobby's target
//! player count, picks a compatible map, and hands the finished instance to
//! a [`GameRuntime`]. Then it starts gathering the next one.
//!
//! # Key types
//!
//! - [`LobbyRegistry`]: key → lobby, created on first use
//! - [`Lobby`]: handle to a running lobby; admit players through it
//! - [`GameRuntime`]: the trait the game-session layer implements
//! - [`GameInstance`]: what the runtime receives: seated players + map
//! - [`Player`]: one connected player's handle
//! - [`ConnectParams`]: lobby parameters decoded from the connect request

mod config;
mod error;
mod lobby;
mod params;
mod player;
mod registry;
mod runtime;

pub use config::{LobbyConfig, DEFAULT_PLAYERS};
pub use error::LobbyError;
pub use lobby::Lobby;
pub use params::ConnectParams;
pub use player::{InboundSender, Player, PlayerId};
pub use registry::{LobbyRegistry, DEFAULT_LOBBY};
pub use runtime::{GameId, GameInstance, GameRuntime};
