//! Error types for map loading.

use std::path::PathBuf;

/// Errors that can occur while loading maps.
///
/// All of these are fatal at startup: a server never runs with a
/// partially loaded or corrupt catalog.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The maps directory could not be listed.
    #[error("couldn't read map directory \"{}\": {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A map file could not be opened or read.
    #[error("couldn't load \"{map}\": {source}")]
    Read {
        map: String,
        #[source]
        source: std::io::Error,
    },

    /// The first line of the map has no tile codes on it.
    #[error("couldn't load \"{map}\": first row has no tiles")]
    EmptyFirstRow { map: String },

    /// A tile code on the given (1-based) line does not fit in a `u32`.
    #[error("couldn't load \"{map}\": tile code out of range on line {line}")]
    TileOutOfRange { map: String, line: usize },

    /// A tile code on the given (1-based) line names a player slot the
    /// format doesn't have.
    #[error("couldn't load \"{map}\": tile {code} on line {line} is past the last player slot")]
    PlayerOutOfRange { map: String, line: usize, code: u32 },
}

impl MapError {
    /// Returns the name of the map (or directory) the error is about.
    pub fn subject(&self) -> String {
        match self {
            Self::ReadDir { path, .. } => path.display().to_string(),
            Self::Read { map, .. }
            | Self::EmptyFirstRow { map }
            | Self::TileOutOfRange { map, .. }
            | Self::PlayerOutOfRange { map, .. } => map.clone(),
        }
    }
}
