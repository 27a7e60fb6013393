//! Error types for the fallible edges of the game: configuration and map files.
//!
//! The per-frame path (movement, rendering) never fails; these only surface at startup.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading or validating a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

/// Failure while loading a hand-authored text map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("could not read map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map has no rows")]
    Empty,

    #[error("map has no locker tile `L` to spawn in")]
    NoSpawn,

    #[error("map has {0} locker tiles, expected exactly one")]
    MultipleSpawns(usize),

    #[error("map has no key tile `K`")]
    NoKeys,

    #[error("map has no exit tile `X`")]
    NoExit,

    #[error("unknown tile {tile:?} at column {x}, row {y}")]
    UnknownTile { tile: char, x: usize, y: usize },
}
