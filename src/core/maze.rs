//! Hand-authored maze loading and normalization.
//!
//! Tiles: `#` wall, `M` moss wall, `V` vine wall, `L` locker (the spawn, exactly
//! one), `T` trap, `K` key, `X` exit, `H` hostile, space or `.` floor.
//! Keys, the exit and hostiles stand on floor cells.
use std::fs;
use std::path::Path;

use crate::core::entity::{EXIT_ID, Entity, EntityKind};
use crate::core::generator::Level;
use crate::core::grid::{CellType, Grid};
use crate::error::MapError;

/// Hostile ids start here so they never collide with keys or the exit.
const FIRST_HOSTILE_ID: u32 = 1000;

/// Reads a map file that can be played to the end: it needs at least one key and an exit.
pub fn load_level(path: impl AsRef<Path>) -> Result<Level, MapError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = parse_level(&text)?;
    ensure_winnable(&level)?;
    Ok(level)
}

pub fn ensure_winnable(level: &Level) -> Result<(), MapError> {
    if level.key_count() == 0 {
        return Err(MapError::NoKeys);
    }
    if !level.entities.iter().any(|e| e.kind == EntityKind::Exit) {
        return Err(MapError::NoExit);
    }
    Ok(())
}

/// Parses tiles and entities. Objectives are not required here; see [`ensure_winnable`].
pub fn parse_level(text: &str) -> Result<Level, MapError> {
    let rows: Vec<Vec<char>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect();
    if rows.is_empty() {
        return Err(MapError::Empty);
    }

    // Ragged rows are padded with walls and the map is squared off.
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let size = width.max(rows.len());
    let mut grid = Grid::filled(size, CellType::Wall);
    let mut entities = Vec::new();
    let mut spawns = Vec::new();
    let mut next_key = 1;
    let mut next_hostile = FIRST_HOSTILE_ID;

    for (y, row) in rows.iter().enumerate() {
        for (x, &tile) in row.iter().enumerate() {
            let cell = match tile {
                ' ' | '.' | '\t' => CellType::Empty,
                '#' => CellType::Wall,
                'M' => CellType::MossWall,
                'V' => CellType::VineWall,
                'T' => CellType::Trap,
                'L' => {
                    spawns.push((x, y));
                    CellType::Locker
                }
                'K' => {
                    entities.push(Entity::at_cell(next_key, EntityKind::Key, x, y));
                    next_key += 1;
                    CellType::Empty
                }
                'X' => {
                    entities.push(Entity::at_cell(EXIT_ID, EntityKind::Exit, x, y));
                    CellType::Empty
                }
                'H' => {
                    entities.push(Entity::at_cell(next_hostile, EntityKind::Hostile, x, y));
                    next_hostile += 1;
                    CellType::Empty
                }
                other => return Err(MapError::UnknownTile { tile: other, x, y }),
            };
            grid.set(x, y, cell);
        }
    }

    match spawns.as_slice() {
        [] => Err(MapError::NoSpawn),
        [(x, y)] => {
            grid.set_spawn((*x as f64 + 0.5, *y as f64 + 0.5));
            log::debug!("loaded {size}x{size} map with {} entities", entities.len());
            Ok(Level { grid, entities })
        }
        many => Err(MapError::MultipleSpawns(many.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_tiles_and_entities() {
        let level = parse_level(
            "#####\n\
             #L K#\n\
             #V#T#\n\
             #X  #\n\
             #####\n",
        )
        .unwrap();
        let grid = &level.grid;
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.spawn(), (1.5, 1.5));
        assert_eq!(grid.get(1, 2), CellType::VineWall);
        assert_eq!(grid.get(3, 2), CellType::Trap);
        assert_eq!(grid.get(3, 1), CellType::Empty);
        let kinds: Vec<_> = level.entities.iter().map(|e| (e.id, e.kind)).collect();
        assert_eq!(kinds, vec![(1, EntityKind::Key), (EXIT_ID, EntityKind::Exit)]);
    }

    #[test]
    fn ragged_rows_are_padded_with_walls() {
        let level = parse_level("###\n#L\n#\n").unwrap();
        assert_eq!(level.grid.size(), 3);
        assert_eq!(level.grid.get(2, 1), CellType::Wall);
        assert_eq!(level.grid.get(1, 2), CellType::Wall);
    }

    #[test]
    fn spawn_must_be_unique() {
        assert!(matches!(parse_level("###\n# #\n###\n"), Err(MapError::NoSpawn)));
        assert!(matches!(parse_level("#LL#\n"), Err(MapError::MultipleSpawns(2))));
        assert!(matches!(parse_level(""), Err(MapError::Empty)));
    }

    #[test]
    fn playable_maps_need_a_key_and_an_exit() {
        let level = parse_level("#LK X#\n").unwrap();
        assert_eq!(level.key_count(), 1);
        assert!(ensure_winnable(&level).is_ok());
        let no_exit = parse_level("#LK #\n").unwrap();
        assert!(matches!(ensure_winnable(&no_exit), Err(MapError::NoExit)));
        let no_keys = parse_level("#L X#\n").unwrap();
        assert!(matches!(ensure_winnable(&no_keys), Err(MapError::NoKeys)));
    }

    #[test]
    fn map_files_without_objectives_are_rejected() {
        let path = std::env::temp_dir().join(format!("glade_runner_no_keys_{}.txt", std::process::id()));
        fs::write(&path, "#####\n#L X#\n#####\n").unwrap();
        let result = load_level(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(MapError::NoKeys)));
    }

    #[test]
    fn unknown_tiles_are_reported_with_position() {
        let err = parse_level("#L?\n").unwrap_err();
        assert!(matches!(err, MapError::UnknownTile { tile: '?', x: 2, y: 0 }));
    }
}
