use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tilefront::prelude::*;
use tilefront::{DEFAULT_BIND_ADDR, DEFAULT_MAPS_DIR, DEFAULT_WS_PATH};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "relay-server", about = "Tilefront lobby server with a frame-relay game runtime")]
struct Args {
    /// Serve only this map (a file name inside the maps directory).
    map: Option<String>,

    /// Directory holding the map files.
    #[arg(long, default_value = DEFAULT_MAPS_DIR)]
    maps_dir: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// WebSocket upgrade path.
    #[arg(long, default_value = DEFAULT_WS_PATH)]
    ws_path: String,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            ws_path: self.ws_path,
            maps_dir: self.maps_dir,
            pinned_map: self.map.filter(|name| !name.is_empty()),
            ..ServerConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Relay runtime
// ---------------------------------------------------------------------------

/// First message every seated player receives.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct LoadData<'a> {
    id: usize,
    field: &'a Playfield,
    options: &'a [String],
}

#[derive(Debug, Default)]
struct Seat {
    index: usize,
    relayed: u64,
}

/// Sends each player the map and their seat, then forwards every frame a
/// player sends to all the others. The game ends when anyone leaves.
struct RelayRuntime;

impl GameRuntime for RelayRuntime {
    type Connection = WebSocketConnection;
    type PlayerState = Seat;

    fn start(&self, game: GameInstance<Self>) {
        let peers: Arc<[Arc<WebSocketConnection>]> = game
            .players
            .iter()
            .map(|p| Arc::clone(p.connection()))
            .collect();
        let lobby: Arc<str> = game.lobby.into();

        for (index, mut player) in game.players.into_iter().enumerate() {
            player.state.index = index;
            let load = LoadData {
                id: index,
                field: &game.map,
                options: &game.options,
            };
            let load = match serde_json::to_string(&load) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode load data");
                    return;
                }
            };
            tokio::spawn(relay(
                player,
                load,
                Arc::clone(&peers),
                Arc::clone(&lobby),
                game.id,
            ));
        }
    }
}

async fn relay(
    mut player: Player<RelayRuntime>,
    load: String,
    peers: Arc<[Arc<WebSocketConnection>]>,
    lobby: Arc<str>,
    game_id: GameId,
) {
    let me = Arc::clone(player.connection());
    if let Err(e) = me.send_text(&load).await {
        tracing::debug!(player_id = %player.id(), error = %e, "failed to send load data");
    }

    while let Some(frame) = player.recv().await {
        for peer in peers.iter().filter(|p| p.id() != me.id()) {
            let sent = match std::str::from_utf8(&frame) {
                Ok(text) => peer.send_text(text).await,
                Err(_) => peer.send(&frame).await,
            };
            if let Err(e) = sent {
                tracing::debug!(conn_id = %peer.id(), error = %e, "relay failed");
            }
        }
        player.state.relayed += 1;
    }

    tracing::info!(
        lobby = %lobby,
        %game_id,
        seat = player.state.index,
        relayed = player.state.relayed,
        "player left, ending game"
    );
    for peer in peers.iter() {
        let _ = peer.close().await;
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let config = Args::parse().into_config();

    let server = match TilefrontServerBuilder::new()
        .config(config)
        .build(RelayRuntime)
        .await
    {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
