//! The parsed form of a single map file.

use std::io::BufRead;

use serde::Serialize;

use crate::{player_index, MapError, MAX_PLAYERS};

/// A parsed map: the tile grid plus how many starting units each player
/// slot has.
///
/// Rows are kept exactly as they appear in the file; they are not required
/// to have equal lengths. Playfields are immutable once loaded and shared
/// between lobbies behind an `Arc`.
///
/// Serializes as `{"Tiles": [[...], ...]}`, the shape clients expect.
/// Only the grid goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playfield {
    #[serde(skip)]
    name: String,

    #[serde(rename = "Tiles")]
    tiles: Vec<Vec<u32>>,

    #[serde(skip)]
    units_per_player: Vec<u32>,
}

impl Playfield {
    /// Parses a map from a line-oriented reader.
    ///
    /// `name` identifies the map in diagnostics and logs (usually its path).
    ///
    /// Every maximal run of ASCII digits on a line is one tile code; all
    /// other bytes are separators. One row is produced per line, and the
    /// text after the final newline always counts as a last row, so a file
    /// ending in `\n` has a trailing empty row.
    ///
    /// # Errors
    /// - [`MapError::Read`] if the reader fails
    /// - [`MapError::TileOutOfRange`] if a code does not fit in a `u32`
    /// - [`MapError::PlayerOutOfRange`] if a code names a player slot past
    ///   [`MAX_PLAYERS`]
    /// - [`MapError::EmptyFirstRow`] if the first line has no tile codes
    pub fn from_reader(
        name: impl Into<String>,
        mut reader: impl BufRead,
    ) -> Result<Self, MapError> {
        let name = name.into();
        let mut tiles = Vec::with_capacity(256);
        let mut slots = SlotCounter::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line).map_err(|source| {
                MapError::Read {
                    map: name.clone(),
                    source,
                }
            })?;

            let row = parse_row(&line).ok_or_else(|| MapError::TileOutOfRange {
                map: name.clone(),
                line: tiles.len() + 1,
            })?;
            for &code in &row {
                if !slots.record(code) {
                    return Err(MapError::PlayerOutOfRange {
                        map: name,
                        line: tiles.len() + 1,
                        code,
                    });
                }
            }
            tiles.push(row);

            if read == 0 || line.last() != Some(&b'\n') {
                break;
            }
        }

        if tiles.first().is_none_or(|row| row.is_empty()) {
            return Err(MapError::EmptyFirstRow { map: name });
        }

        Ok(Self {
            name,
            tiles,
            units_per_player: slots.finish(),
        })
    }

    /// Parses a map held in memory. See [`from_reader`](Self::from_reader).
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, MapError> {
        Self::from_reader(name, text.as_bytes())
    }

    /// The name this map was loaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile rows in file order.
    pub fn tiles(&self) -> &[Vec<u32>] {
        &self.tiles
    }

    /// Starting unit count for each player slot, indexed by player.
    pub fn units_per_player(&self) -> &[u32] {
        &self.units_per_player
    }

    /// Number of player slots on this map.
    pub fn player_count(&self) -> usize {
        self.units_per_player.len()
    }
}

/// Tracks the highest player index seen and per-player unit counts.
#[derive(Default)]
struct SlotCounter {
    units: Vec<u32>,
    players: usize,
}

impl SlotCounter {
    /// Returns `false` for a player index past [`MAX_PLAYERS`], leaving the
    /// counts untouched.
    fn record(&mut self, code: u32) -> bool {
        let Some(index) = player_index(code) else {
            return true;
        };
        if index >= MAX_PLAYERS {
            return false;
        }
        if index >= self.players {
            self.players = index + 1;
        }
        if self.units.len() < self.players {
            self.units.resize(self.players, 0);
        }
        // Slot 0 reserves a seat but its units are never counted.
        if index > 0 {
            self.units[index] += 1;
        }
        true
    }

    fn finish(mut self) -> Vec<u32> {
        self.units.resize(self.players, 0);
        self.units
    }
}

/// Extracts every run of ASCII digits from a line.
///
/// Returns `None` if a run overflows `u32`.
fn parse_row(line: &[u8]) -> Option<Vec<u32>> {
    let mut row = Vec::new();
    let mut current: Option<u32> = None;

    for &byte in line {
        if byte.is_ascii_digit() {
            let digit = u32::from(byte - b'0');
            let value = current.unwrap_or(0);
            current = Some(value.checked_mul(10)?.checked_add(digit)?);
        } else if let Some(code) = current.take() {
            row.push(code);
        }
    }
    if let Some(code) = current {
        row.push(code);
    }

    Some(row)
}
