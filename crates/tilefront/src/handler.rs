//! Per-connection handler: handshake, lobby resolution, admission, and
//! inbound pump.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Complete the WebSocket handshake (path check, timeout)
//!   2. Read `custom` / `players` / `option` from the upgrade request
//!   3. Resolve or create the lobby under the registry lock
//!   4. Admit a `Player` to the lobby's intake
//!   5. Loop: forward received frames into the player's inbound queue

use std::sync::Arc;

use tilefront_lobby::{ConnectParams, GameRuntime, InboundSender, Player, PlayerId};
use tilefront_transport::{
    Connection, ConnectionId, Upgrade, WebSocketConnection, WebSocketUpgrade,
};

use crate::server::ServerState;
use crate::TilefrontError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<R>(
    pending: WebSocketUpgrade,
    state: Arc<ServerState<R>>,
) -> Result<(), TilefrontError>
where
    R: GameRuntime<Connection = WebSocketConnection>,
{
    let peer = pending.peer_addr();
    let conn = match pending.upgrade().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::debug!(%peer, error = %e, "handshake failed");
            return Err(e.into());
        }
    };

    let conn_id = conn.id();
    let params = ConnectParams::from_request(conn.request());
    tracing::debug!(%conn_id, lobby = %params.custom, "handling new connection");

    let resolved = {
        let mut lobbies = state.lobbies.lock().await;
        lobbies.resolve_or_create(&params.custom, params.players.as_deref(), &params.options)
    };
    let lobby = match resolved {
        Ok(lobby) => lobby,
        Err(e) => {
            tracing::warn!(
                %conn_id,
                lobby = %params.custom,
                players = ?params.players,
                error = %e,
                "dropping connection"
            );
            if let Err(close_err) = conn.close().await {
                tracing::debug!(%conn_id, error = %close_err, "close failed");
            }
            return Err(e.into());
        }
    };

    let conn = Arc::new(conn);
    let (player, inbound) = Player::<R>::new(Arc::clone(&conn));
    let player_id = player.id();
    tracing::info!(%conn_id, %player_id, lobby = %lobby.key(), "got new connection");

    lobby.admit(player).await?;
    drop(lobby);

    pump_inbound(&conn, conn_id, player_id, inbound).await;
    Ok(())
}

/// Forwards frames from the socket to the player's inbound queue until
/// either side goes away.
async fn pump_inbound(
    conn: &WebSocketConnection,
    conn_id: ConnectionId,
    player_id: PlayerId,
    inbound: InboundSender,
) {
    loop {
        match conn.recv().await {
            Ok(Some(data)) => {
                if inbound.send(data).is_err() {
                    tracing::debug!(%conn_id, %player_id, "player released by runtime");
                    break;
                }
            }
            Ok(None) => {
                tracing::info!(%conn_id, %player_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, %player_id, error = %e, "recv failed");
                break;
            }
        }
    }
}
