//! Tile maps for Tilefront.
//!
//! A map is a plain text file: one grid row per line, tile codes written as
//! decimal numbers separated by anything that isn't a digit. Codes at or
//! above [`FIRST_PLAYER_TILE`] mark a player's starting units, and the
//! highest player index referenced decides how many seats the map has.
//!
//! # Key types
//!
//! - [`Playfield`]: one parsed map (tile rows + units per player)
//! - [`MapCatalog`]: every loaded map, grouped by player count
//! - [`MapSource`]: where the catalog is loaded from (directory or one pinned file)
//!
//! Loading is all-or-nothing: any unreadable or corrupt file fails the
//! whole load with a [`MapError`] naming that file.

mod catalog;
mod error;
mod loader;
mod playfield;
mod tile;

pub use catalog::MapCatalog;
pub use error::MapError;
pub use loader::{load_dir, load_file, MapSource};
pub use playfield::Playfield;
pub use tile::{player_index, FIRST_PLAYER_TILE, MAX_PLAYERS};
