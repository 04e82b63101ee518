//! Unified error type for Tilefront.

use tilefront_lobby::LobbyError;
use tilefront_maps::MapError;
use tilefront_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TilefrontError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A map could not be loaded.
    #[error(transparent)]
    Map(#[from] MapError),

    /// A lobby could not be resolved or a player not admitted.
    #[error(transparent)]
    Lobby(#[from] LobbyError),
}
