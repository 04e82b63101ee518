//! Lobby handle and its spawner actor.
//!
//! Each lobby owns one spawner task, fed through a bounded mpsc channel
//! (the intake). The spawner is the only reader of that channel, so players
//! are seated strictly in the order they were admitted. Lobbies never share
//! mutable state with each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::seq::IndexedRandom;
use tilefront_maps::{MapCatalog, Playfield};
use tokio::sync::mpsc;

use crate::{GameId, GameInstance, GameRuntime, LobbyConfig, LobbyError, Player};

/// Handle to a running lobby.
///
/// Shared behind an `Arc` by the registry and every connection that
/// resolved it. Dropping the last handle closes the intake and stops the
/// spawner once it is idle.
pub struct Lobby<R: GameRuntime> {
    key: String,
    target_players: usize,
    options: Arc<[String]>,
    maps: Arc<[Arc<Playfield>]>,
    intake: mpsc::Sender<Player<R>>,
    next_id: Arc<AtomicU64>,
}

impl<R: GameRuntime> std::fmt::Debug for Lobby<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lobby")
            .field("key", &self.key)
            .field("target_players", &self.target_players)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: GameRuntime> Lobby<R> {
    /// Creates a lobby and starts its spawner task.
    ///
    /// The lobby is bound to the catalog's maps for `config.target_players`.
    ///
    /// # Errors
    /// - [`LobbyError::InvalidPlayerCount`] if the target is zero
    /// - [`LobbyError::NoCompatibleMaps`] if no map seats that many players
    pub fn spawn(
        key: impl Into<String>,
        config: LobbyConfig,
        catalog: &MapCatalog,
        runtime: Arc<R>,
    ) -> Result<Arc<Self>, LobbyError> {
        let key = key.into();
        let target_players = config.target_players;
        if target_players == 0 {
            return Err(LobbyError::InvalidPlayerCount(target_players));
        }
        let maps: Arc<[Arc<Playfield>]> = catalog.lookup(target_players).into();
        if maps.is_empty() {
            return Err(LobbyError::NoCompatibleMaps(target_players));
        }

        let options: Arc<[String]> = config.options.into();
        let (tx, rx) = mpsc::channel(target_players);
        let next_id = Arc::new(AtomicU64::new(0));

        let spawner = Spawner {
            lobby: key.clone(),
            target_players,
            options: Arc::clone(&options),
            maps: Arc::clone(&maps),
            intake: rx,
            next_id: Arc::clone(&next_id),
            runtime,
        };
        let first = spawner.allocate_id();
        tokio::spawn(spawner.run(first));

        tracing::info!(
            lobby = %key,
            players = target_players,
            maps = maps.len(),
            "lobby created"
        );

        Ok(Arc::new(Self {
            key,
            target_players,
            options,
            maps,
            intake: tx,
            next_id,
        }))
    }

    /// Queues a player for the next free seat.
    ///
    /// Waits if the intake is full, which only lasts until the spawner
    /// catches up.
    pub async fn admit(&self, player: Player<R>) -> Result<(), LobbyError> {
        self.intake
            .send(player)
            .await
            .map_err(|_| LobbyError::Closed(self.key.clone()))
    }

    /// The key this lobby is registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Players per game instance.
    pub fn target_players(&self) -> usize {
        self.target_players
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Maps a game in this lobby may be played on.
    pub fn compatible_maps(&self) -> &[Arc<Playfield>] {
        &self.maps
    }

    /// The id the next spawned instance will get, which is also the number
    /// of instances spawned so far (including the one being gathered).
    pub fn next_instance_id(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }
}

/// The spawner actor. Runs inside a Tokio task for the lobby's lifetime.
struct Spawner<R: GameRuntime> {
    lobby: String,
    target_players: usize,
    options: Arc<[String]>,
    maps: Arc<[Arc<Playfield>]>,
    intake: mpsc::Receiver<Player<R>>,
    next_id: Arc<AtomicU64>,
    runtime: Arc<R>,
}

impl<R: GameRuntime> Spawner<R> {
    /// Gathers and hands off instances until the intake closes.
    async fn run(mut self, mut game_id: GameId) {
        loop {
            tracing::info!(lobby = %self.lobby, %game_id, "spawning game");

            let Some(players) = self.gather(game_id).await else {
                tracing::info!(lobby = %self.lobby, "lobby intake closed, spawner stopped");
                return;
            };
            self.hand_off(game_id, players);
            game_id = self.allocate_id();
        }
    }

    fn allocate_id(&self) -> GameId {
        GameId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Seats players in arrival order until the instance is full.
    ///
    /// Returns `None` if the intake closes first; any partially seated
    /// players are dropped with it.
    async fn gather(&mut self, game_id: GameId) -> Option<Vec<Player<R>>> {
        let mut players = Vec::with_capacity(self.target_players);
        while players.len() < self.target_players {
            let player = self.intake.recv().await?;
            tracing::debug!(
                lobby = %self.lobby,
                %game_id,
                player_id = %player.id(),
                seat = players.len(),
                "player seated"
            );
            players.push(player);
        }
        Some(players)
    }

    fn hand_off(&self, game_id: GameId, players: Vec<Player<R>>) {
        let Some(map) = self.maps.choose(&mut rand::rng()).cloned() else {
            // Lobby::spawn never builds a spawner without maps.
            tracing::error!(lobby = %self.lobby, %game_id, "no map to play on, dropping game");
            return;
        };

        tracing::info!(
            lobby = %self.lobby,
            %game_id,
            map = map.name(),
            players = players.len(),
            "game full, handing off"
        );

        self.runtime.start(GameInstance {
            id: game_id,
            lobby: self.lobby.clone(),
            players,
            map,
            options: Arc::clone(&self.options),
        });
    }
}
