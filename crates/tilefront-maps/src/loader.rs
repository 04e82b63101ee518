//! Loading playfields from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{MapCatalog, MapError, Playfield};

/// Where the server's map catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    /// Every visible file in a directory.
    Directory(PathBuf),
    /// Exactly one map file; the server only offers its player count.
    Pinned(PathBuf),
}

impl MapSource {
    /// Loads the catalog this source describes.
    pub fn load(&self) -> Result<MapCatalog, MapError> {
        match self {
            Self::Directory(dir) => load_dir(dir),
            Self::Pinned(path) => {
                let field = load_file(path)?;
                tracing::info!(
                    map = field.name(),
                    players = field.player_count(),
                    "pinned to a single map"
                );
                Ok(MapCatalog::single(field))
            }
        }
    }
}

/// Loads a single map file.
pub fn load_file(path: &Path) -> Result<Playfield, MapError> {
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| MapError::Read {
        map: name.clone(),
        source,
    })?;
    let field = Playfield::from_reader(name, BufReader::new(file))?;
    tracing::debug!(
        map = field.name(),
        rows = field.tiles().len(),
        players = field.player_count(),
        "map loaded"
    );
    Ok(field)
}

/// Loads every map in `dir` and groups them by player count.
///
/// Entries whose names start with `.` are skipped, as are subdirectories.
/// Files are loaded in name order so catalog groups are deterministic.
/// The first bad file aborts the whole load.
pub fn load_dir(dir: &Path) -> Result<MapCatalog, MapError> {
    let read_dir_err = |source| MapError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type().map_err(read_dir_err)?;
        if file_type.is_dir() {
            tracing::debug!(path = %entry.path().display(), "skipping subdirectory");
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    let fields = paths
        .iter()
        .map(|path| load_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    let catalog = MapCatalog::classify(fields);

    for players in catalog.player_counts() {
        tracing::info!(
            players,
            maps = catalog.lookup(players).len(),
            "maps available"
        );
    }
    tracing::info!(dir = %dir.display(), total = catalog.len(), "map catalog loaded");

    Ok(catalog)
}
