//! Tile code decoding.

/// Tile codes at or above this value belong to a player.
///
/// The player index is `code - FIRST_PLAYER_TILE`, so `100` is player 0,
/// `101` is player 1, and so on. This is part of the map file format.
pub const FIRST_PLAYER_TILE: u32 = 100;

/// Number of player slots a map may use: codes `100..=123`.
pub const MAX_PLAYERS: usize = 24;

/// Returns the player index a tile code belongs to, or `None` for
/// terrain tiles.
pub fn player_index(code: u32) -> Option<usize> {
    code.checked_sub(FIRST_PLAYER_TILE).map(|index| index as usize)
}
