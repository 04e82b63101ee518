//! Integration tests for lobbies, spawning, and the registry, using a mock
//! connection and a runtime that records every hand-off.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tilefront_lobby::{
    GameId, GameInstance, GameRuntime, Lobby, LobbyConfig, LobbyError,
    LobbyRegistry, Player, PlayerId, DEFAULT_LOBBY,
};
use tilefront_maps::{MapCatalog, Playfield};
use tilefront_transport::{ConnectRequest, Connection, ConnectionId};
use tokio::sync::mpsc;

// =========================================================================
// Mocks
// =========================================================================

static NEXT_MOCK_ID: AtomicU64 = AtomicU64::new(1);

/// A connection that never carries any data.
struct MockConn {
    id: ConnectionId,
    request: ConnectRequest,
}

impl MockConn {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::new(NEXT_MOCK_ID.fetch_add(1, Ordering::Relaxed)),
            request: ConnectRequest::new("/ws", None),
        })
    }
}

impl Connection for MockConn {
    type Error = std::io::Error;

    async fn send(&self, _data: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(None)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }

    fn request(&self) -> &ConnectRequest {
        &self.request
    }
}

/// What the recording runtime saw for one game.
#[derive(Debug)]
struct Handoff {
    id: GameId,
    lobby: String,
    players: Vec<PlayerId>,
    map_players: usize,
    map_name: String,
    options: Vec<String>,
}

/// Reports every started game on a channel.
struct RecordingRuntime {
    tx: mpsc::UnboundedSender<Handoff>,
}

#[derive(Default)]
struct SeatState {
    _started: bool,
}

impl GameRuntime for RecordingRuntime {
    type Connection = MockConn;
    type PlayerState = SeatState;

    fn start(&self, game: GameInstance<Self>) {
        let _ = self.tx.send(Handoff {
            id: game.id,
            lobby: game.lobby,
            players: game.players.iter().map(Player::id).collect(),
            map_players: game.map.player_count(),
            map_name: game.map.name().to_string(),
            options: game.options.to_vec(),
        });
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn catalog() -> Arc<MapCatalog> {
    Arc::new(MapCatalog::classify([
        Playfield::parse("duel-a", "1 100 0 101 1").unwrap(),
        Playfield::parse("duel-b", "100 0\n0 101").unwrap(),
        Playfield::parse("trio", "100 101 102").unwrap(),
    ]))
}

fn runtime() -> (Arc<RecordingRuntime>, mpsc::UnboundedReceiver<Handoff>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(RecordingRuntime { tx }), rx)
}

fn registry() -> (LobbyRegistry<RecordingRuntime>, mpsc::UnboundedReceiver<Handoff>) {
    let (rt, rx) = runtime();
    let reg = LobbyRegistry::new(catalog(), rt, LobbyConfig::default())
        .expect("default lobby should be created");
    (reg, rx)
}

fn player() -> Player<RecordingRuntime> {
    Player::new(MockConn::new()).0
}

fn config(players: usize) -> LobbyConfig {
    LobbyConfig {
        target_players: players,
        options: Vec::new(),
    }
}

async fn next_handoff(rx: &mut mpsc::UnboundedReceiver<Handoff>) -> Handoff {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("hand-off should arrive")
        .expect("runtime channel open")
}

async fn assert_no_handoff(rx: &mut mpsc::UnboundedReceiver<Handoff>) {
    let result = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(result.is_err(), "unexpected hand-off: {result:?}");
}

// =========================================================================
// Lobby + spawner
// =========================================================================

#[tokio::test]
async fn test_three_players_fill_one_instance_in_arrival_order() {
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("abc", config(3), &catalog(), rt).unwrap();

    let players: Vec<_> = (0..3).map(|_| player()).collect();
    let ids: Vec<PlayerId> = players.iter().map(Player::id).collect();
    for p in players {
        lobby.admit(p).await.unwrap();
    }

    let game = next_handoff(&mut rx).await;
    assert_eq!(game.id, GameId(0));
    assert_eq!(game.lobby, "abc");
    assert_eq!(game.players, ids);
    assert_no_handoff(&mut rx).await;
}

#[tokio::test]
async fn test_fourth_player_starts_next_instance() {
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("abc", config(3), &catalog(), rt).unwrap();

    for _ in 0..3 {
        lobby.admit(player()).await.unwrap();
    }
    let first = next_handoff(&mut rx).await;

    let fourth = player();
    let fourth_id = fourth.id();
    lobby.admit(fourth).await.unwrap();
    assert_no_handoff(&mut rx).await;

    lobby.admit(player()).await.unwrap();
    lobby.admit(player()).await.unwrap();
    let second = next_handoff(&mut rx).await;

    assert_eq!(second.id, GameId(first.id.0 + 1));
    assert_eq!(second.players[0], fourth_id);
    assert!(second.players.iter().all(|p| !first.players.contains(p)));
}

#[tokio::test]
async fn test_partial_instance_is_not_handed_off() {
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("k", config(2), &catalog(), rt).unwrap();

    lobby.admit(player()).await.unwrap();
    assert_no_handoff(&mut rx).await;
}

#[tokio::test]
async fn test_single_seat_lobby_hands_off_every_player() {
    let catalog = Arc::new(MapCatalog::classify([
        Playfield::parse("solo", "0 100 0").unwrap(),
    ]));
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("solo", config(1), &catalog, rt).unwrap();

    for expected in 0..3 {
        lobby.admit(player()).await.unwrap();
        let game = next_handoff(&mut rx).await;
        assert_eq!(game.id, GameId(expected));
        assert_eq!(game.players.len(), 1);
    }
}

#[tokio::test]
async fn test_map_is_drawn_from_matching_player_count_only() {
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("trio", config(3), &catalog(), rt).unwrap();

    for _ in 0..5 {
        for _ in 0..3 {
            lobby.admit(player()).await.unwrap();
        }
        let game = next_handoff(&mut rx).await;
        assert_eq!(game.map_players, 3);
        assert_eq!(game.map_name, "trio");
    }
}

#[tokio::test]
async fn test_duel_maps_come_from_duel_group() {
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("duel", config(2), &catalog(), rt).unwrap();
    assert_eq!(lobby.compatible_maps().len(), 2);

    for _ in 0..10 {
        lobby.admit(player()).await.unwrap();
        lobby.admit(player()).await.unwrap();
        let game = next_handoff(&mut rx).await;
        assert_eq!(game.map_players, 2);
        assert!(game.map_name.starts_with("duel-"));
    }
}

#[tokio::test]
async fn test_options_are_passed_through() {
    let (rt, mut rx) = runtime();
    let options = vec!["fog".to_string(), "fast".to_string()];
    let lobby = Lobby::spawn(
        "opt",
        LobbyConfig {
            target_players: 2,
            options: options.clone(),
        },
        &catalog(),
        rt,
    )
    .unwrap();
    assert_eq!(lobby.options(), options.as_slice());

    lobby.admit(player()).await.unwrap();
    lobby.admit(player()).await.unwrap();
    assert_eq!(next_handoff(&mut rx).await.options, options);
}

#[tokio::test]
async fn test_spawn_without_maps_fails() {
    let (rt, _rx) = runtime();
    let result = Lobby::spawn("big", config(5), &catalog(), rt);
    assert!(matches!(result, Err(LobbyError::NoCompatibleMaps(5))));
}

#[tokio::test]
async fn test_spawn_zero_players_fails() {
    let (rt, _rx) = runtime();
    let result = Lobby::spawn("none", config(0), &catalog(), rt);
    assert!(matches!(result, Err(LobbyError::InvalidPlayerCount(0))));
}

#[tokio::test]
async fn test_instance_ids_strictly_increase_without_gaps() {
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("ids", config(2), &catalog(), rt).unwrap();
    assert_eq!(lobby.next_instance_id(), 1, "first instance is being gathered");

    let mut seen = Vec::new();
    for _ in 0..6 {
        lobby.admit(player()).await.unwrap();
        lobby.admit(player()).await.unwrap();
        seen.push(next_handoff(&mut rx).await.id.0);
    }
    assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_concurrent_admissions_seat_everyone_exactly_once() {
    let (rt, mut rx) = runtime();
    let lobby = Lobby::spawn("rush", config(2), &catalog(), rt).unwrap();

    let mut admitted = Vec::new();
    let mut tasks = Vec::new();
    for _ in 0..20 {
        let p = player();
        admitted.push(p.id());
        let lobby = Arc::clone(&lobby);
        tasks.push(tokio::spawn(async move { lobby.admit(p).await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut seated = Vec::new();
    let mut last_id = None;
    for _ in 0..10 {
        let game = next_handoff(&mut rx).await;
        assert_eq!(game.players.len(), 2);
        if let Some(last) = last_id {
            assert!(game.id > last);
        }
        last_id = Some(game.id);
        seated.extend(game.players);
    }

    seated.sort_by_key(|p| p.0);
    admitted.sort_by_key(|p| p.0);
    assert_eq!(seated, admitted);
}

#[tokio::test]
async fn test_lobbies_spawn_independently() {
    let (rt, mut rx) = runtime();
    let a = Lobby::spawn("a", config(2), &catalog(), Arc::clone(&rt)).unwrap();
    let b = Lobby::spawn("b", config(2), &catalog(), rt).unwrap();

    a.admit(player()).await.unwrap();
    b.admit(player()).await.unwrap();
    assert_no_handoff(&mut rx).await;

    b.admit(player()).await.unwrap();
    let game = next_handoff(&mut rx).await;
    assert_eq!(game.lobby, "b");
    assert_eq!(game.id, GameId(0));
}

// =========================================================================
// Registry
// =========================================================================

#[tokio::test]
async fn test_registry_starts_with_default_lobby() {
    let (reg, _rx) = registry();
    let default = reg.get(DEFAULT_LOBBY).expect("default lobby exists");
    assert_eq!(default.target_players(), 2);
    assert_eq!(reg.len(), 1);
    assert!(!reg.is_empty());
}

#[tokio::test]
async fn test_registry_new_fails_without_maps_for_default() {
    let (rt, _rx) = runtime();
    let only_trio = Arc::new(MapCatalog::single(
        Playfield::parse("trio", "100 101 102").unwrap(),
    ));
    let result = LobbyRegistry::new(only_trio, rt, LobbyConfig::default());
    assert!(matches!(result, Err(LobbyError::NoCompatibleMaps(2))));
}

#[tokio::test]
async fn test_resolve_creates_with_requested_count() {
    let (mut reg, _rx) = registry();
    let lobby = reg.resolve_or_create("abc", Some("3"), &[]).unwrap();
    assert_eq!(lobby.key(), "abc");
    assert_eq!(lobby.target_players(), 3);
    assert_eq!(reg.len(), 2);
}

#[tokio::test]
async fn test_resolve_existing_ignores_new_hint_and_options() {
    let (mut reg, _rx) = registry();
    let first = reg.resolve_or_create("abc", Some("3"), &[]).unwrap();
    let second = reg
        .resolve_or_create("abc", Some("5"), &["fog".to_string()])
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.target_players(), 3);
    assert!(second.options().is_empty());
    assert_eq!(reg.len(), 2);
}

#[tokio::test]
async fn test_resolve_existing_ignores_malformed_hint() {
    let (mut reg, _rx) = registry();
    let first = reg.resolve_or_create("abc", None, &[]).unwrap();
    let again = reg.resolve_or_create("abc", Some("lots"), &[]).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
}

#[tokio::test]
async fn test_resolve_missing_hint_defaults_to_two() {
    let (mut reg, _rx) = registry();
    let lobby = reg.resolve_or_create("fresh", None, &[]).unwrap();
    assert_eq!(lobby.target_players(), 2);
}

#[tokio::test]
async fn test_resolve_malformed_hint_leaves_registry_unchanged() {
    let (mut reg, _rx) = registry();
    let err = reg.resolve_or_create("abc", Some("three"), &[]).unwrap_err();
    assert!(matches!(err, LobbyError::MalformedPlayers(_)));
    assert!(reg.get("abc").is_none());
    assert_eq!(reg.len(), 1);
}

#[tokio::test]
async fn test_resolve_unsupported_count_leaves_registry_unchanged() {
    let (mut reg, _rx) = registry();
    let err = reg.resolve_or_create("big", Some("7"), &[]).unwrap_err();
    assert!(matches!(err, LobbyError::NoCompatibleMaps(7)));
    assert!(reg.get("big").is_none());
}

#[tokio::test]
async fn test_empty_key_is_distinct_from_default() {
    let (mut reg, _rx) = registry();
    let empty = reg.resolve_or_create("", None, &[]).unwrap();
    let default = reg.resolve_or_create(DEFAULT_LOBBY, None, &[]).unwrap();
    assert!(!Arc::ptr_eq(&empty, &default));

    let mut keys = reg.keys();
    keys.sort();
    assert_eq!(keys, vec!["".to_string(), DEFAULT_LOBBY.to_string()]);
}

#[tokio::test]
async fn test_resolve_same_key_twice_returns_same_lobby() {
    let (mut reg, _rx) = registry();
    let a = reg.resolve_or_create(DEFAULT_LOBBY, Some("4"), &[]).unwrap();
    let b = reg.resolve_or_create(DEFAULT_LOBBY, None, &[]).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.target_players(), 2);
}

#[tokio::test]
async fn test_registry_lobby_spawns_games() {
    let (mut reg, mut rx) = registry();
    let lobby = reg.resolve_or_create("abc", Some("3"), &[]).unwrap();
    for _ in 0..3 {
        lobby.admit(player()).await.unwrap();
    }
    let game = next_handoff(&mut rx).await;
    assert_eq!(game.lobby, "abc");
    assert_eq!(game.players.len(), 3);
}

// =========================================================================
// Player handle
// =========================================================================

#[tokio::test]
async fn test_player_buffers_inbound_frames() {
    let (mut p, inbound) = Player::<RecordingRuntime>::new(MockConn::new());
    inbound.send(b"ready".to_vec()).unwrap();
    inbound.send(b"pong".to_vec()).unwrap();
    drop(inbound);

    assert_eq!(p.recv().await.as_deref(), Some(&b"ready"[..]));
    assert_eq!(p.try_recv().as_deref(), Some(&b"pong"[..]));
    assert_eq!(p.recv().await, None);
}

#[tokio::test]
async fn test_player_ids_are_unique() {
    let a = player();
    let b = player();
    assert_ne!(a.id(), b.id());
    assert_ne!(a.connection_id(), b.connection_id());
}
