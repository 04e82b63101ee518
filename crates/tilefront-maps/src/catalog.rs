//! Playfields grouped by player count.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Playfield;

/// Every loaded map, grouped by how many players it seats.
///
/// Built once at startup and read-only afterwards, so it is shared across
/// lobbies without any locking. Within a group, maps keep the order they
/// were classified in.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    by_players: BTreeMap<usize, Vec<Arc<Playfield>>>,
}

impl MapCatalog {
    /// Groups playfields by [`Playfield::player_count`].
    pub fn classify(fields: impl IntoIterator<Item = Playfield>) -> Self {
        let mut by_players: BTreeMap<usize, Vec<Arc<Playfield>>> =
            BTreeMap::new();
        for field in fields {
            by_players
                .entry(field.player_count())
                .or_default()
                .push(Arc::new(field));
        }
        Self { by_players }
    }

    /// A catalog holding exactly one map.
    ///
    /// Used when the server is pinned to a single map: that map's player
    /// count becomes the only lobby size with anything to play on.
    pub fn single(field: Playfield) -> Self {
        Self::classify([field])
    }

    /// Returns the maps that seat exactly `players` players.
    ///
    /// Empty if no map supports that count.
    pub fn lookup(&self, players: usize) -> &[Arc<Playfield>] {
        self.by_players
            .get(&players)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Player counts that have at least one map, ascending.
    pub fn player_counts(&self) -> Vec<usize> {
        self.by_players.keys().copied().collect()
    }

    /// Total number of maps across all groups.
    pub fn len(&self) -> usize {
        self.by_players.values().map(Vec::len).sum()
    }

    /// Returns `true` if no maps were loaded.
    pub fn is_empty(&self) -> bool {
        self.by_players.is_empty()
    }
}
