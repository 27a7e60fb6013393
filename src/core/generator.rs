//! Procedural maze generation.
//!
//! Carving is a recursive backtracker run on an explicit stack, so every carved
//! cell is connected to the start before any other pass touches the grid. The
//! later passes only ever turn walls into floor next to existing floor, turn
//! walls into other walls, or turn floor into traps; none of them can cut a
//! region off.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::MazeConfig;
use crate::core::entity::{EXIT_ID, Entity, EntityKind};
use crate::core::grid::{CellType, Grid};
use crate::error::ConfigError;

/// How much the distance threshold shrinks after a stalled placement round.
const RELAX_FACTOR: f64 = 0.75;

/// A freshly generated world: grid plus the initial entity list.
#[derive(Debug, Clone)]
pub struct Level {
    pub grid: Grid,
    pub entities: Vec<Entity>,
}

impl Level {
    pub fn spawn(&self) -> (f64, f64) {
        self.grid.spawn()
    }

    pub fn key_count(&self) -> u32 {
        self.entities.iter().filter(|e| e.kind == EntityKind::Key).count() as u32
    }
}

pub struct MazeGenerator {
    config: MazeConfig,
}

/// One frame of the carving stack: a visited cell and the directions it still has to try.
struct Frame {
    x: usize,
    y: usize,
    dirs: [(i64, i64); 4],
    next: usize,
}

impl MazeGenerator {
    pub fn new(config: MazeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Deterministic for a given config (the seed lives in it).
    pub fn generate(&self) -> Level {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let size = self.config.size;
        let start = size / 2;

        let mut grid = Grid::filled(size, CellType::Wall);
        grid.set_spawn((start as f64 + 0.5, start as f64 + 0.5));

        let carved = self.carve(&mut grid, &mut rng, start);
        grid.set(start, start, CellType::Locker);
        let loops = self.add_loops(&mut grid, &mut rng);
        let decorated = self.decorate(&mut grid, &mut rng);
        let traps = self.place_traps(&mut grid, &mut rng, start);
        log::debug!(
            "maze seed={} size={size}: carved {carved} cells, {loops} loops, {decorated} decorated walls, {traps} traps",
            self.config.seed
        );

        let entities = self.place_objectives(&grid, &mut rng, start);
        Level { grid, entities }
    }

    fn carve(&self, grid: &mut Grid, rng: &mut ChaCha8Rng, start: usize) -> usize {
        let radius = self.config.corridor.radius();
        let step = self.config.corridor.step() as i64;
        let size = grid.size();
        // The carved block around a cell has to stay off the outer border.
        let fits = |x: i64, y: i64| {
            let r = radius as i64;
            x - r >= 1 && y - r >= 1 && x + r <= size as i64 - 2 && y + r <= size as i64 - 2
        };

        let mut carved = carve_block(grid, start, start, radius);
        let mut stack = vec![new_frame(start, start, step, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.dirs.len() {
                stack.pop();
                continue;
            }
            let (dx, dy) = frame.dirs[frame.next];
            frame.next += 1;
            let (x, y) = (frame.x, frame.y);

            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if !fits(nx, ny) || grid.get(nx, ny) != CellType::Wall {
                continue;
            }
            for k in 1..step {
                let mx = (x as i64 + dx / step * k) as usize;
                let my = (y as i64 + dy / step * k) as usize;
                carved += carve_block(grid, mx, my, radius);
            }
            let (nx, ny) = (nx as usize, ny as usize);
            carved += carve_block(grid, nx, ny, radius);
            stack.push(new_frame(nx, ny, step, rng));
        }
        carved
    }

    /// Knocks out walls that already touch two floor cells, adding cycles.
    fn add_loops(&self, grid: &mut Grid, rng: &mut ChaCha8Rng) -> usize {
        let size = grid.size();
        let mut opened = 0;
        for _ in 0..size * self.config.loop_attempts_per_cell {
            let x = rng.gen_range(1..size - 1);
            let y = rng.gen_range(1..size - 1);
            if grid.get(x as i64, y as i64) != CellType::Wall {
                continue;
            }
            let empty = grid
                .neighbors(x, y)
                .filter(|&(nx, ny)| grid.get(nx as i64, ny as i64) == CellType::Empty)
                .count();
            if empty >= 2 {
                grid.set(x, y, CellType::Empty);
                opened += 1;
            }
        }
        opened
    }

    /// Swaps some corridor-facing walls for moss or vines. Only wall types change.
    fn decorate(&self, grid: &mut Grid, rng: &mut ChaCha8Rng) -> usize {
        let size = grid.size();
        let mut changed = 0;
        for y in 1..size - 1 {
            for x in 1..size - 1 {
                if grid.get(x as i64, y as i64) != CellType::Wall {
                    continue;
                }
                let faces_floor = grid
                    .neighbors(x, y)
                    .any(|(nx, ny)| grid.get(nx as i64, ny as i64).is_walkable());
                if !faces_floor {
                    continue;
                }
                let roll: f64 = rng.gen_range(0.0..1.0);
                let cell = if roll < self.config.vine_chance {
                    CellType::VineWall
                } else if roll < self.config.vine_chance + self.config.moss_chance {
                    CellType::MossWall
                } else {
                    continue;
                };
                grid.set(x, y, cell);
                changed += 1;
            }
        }
        changed
    }

    fn place_traps(&self, grid: &mut Grid, rng: &mut ChaCha8Rng, start: usize) -> usize {
        if self.config.trap_chance <= 0.0 {
            return 0;
        }
        let size = grid.size();
        let mut placed = 0;
        for y in 1..size - 1 {
            for x in 1..size - 1 {
                if grid.get(x as i64, y as i64) != CellType::Empty
                    || cell_distance(x, y, start) <= self.config.trap_safe_radius
                {
                    continue;
                }
                if rng.gen_bool(self.config.trap_chance) {
                    grid.set(x, y, CellType::Trap);
                    placed += 1;
                }
            }
        }
        placed
    }

    fn place_objectives(&self, grid: &Grid, rng: &mut ChaCha8Rng, start: usize) -> Vec<Entity> {
        let size = grid.size() as f64;
        let mut taken: Vec<(usize, usize)> = Vec::new();
        let mut entities = Vec::with_capacity(self.config.total_keys as usize + 1);

        for id in 1..=self.config.total_keys {
            let (x, y) = self.sample_cell(grid, rng, start, size / self.config.key_distance_divisor, &taken);
            taken.push((x, y));
            entities.push(Entity::at_cell(id, EntityKind::Key, x, y));
        }
        let (x, y) = self.sample_cell(grid, rng, start, size / self.config.exit_distance_divisor, &taken);
        entities.push(Entity::at_cell(EXIT_ID, EntityKind::Exit, x, y));
        entities
    }

    /// Rejection sampling for a free Empty cell further than `min_distance` from
    /// the start. Each stalled round relaxes the threshold; after the last round
    /// the furthest free Empty cell is taken outright.
    fn sample_cell(
        &self,
        grid: &Grid,
        rng: &mut ChaCha8Rng,
        start: usize,
        min_distance: f64,
        taken: &[(usize, usize)],
    ) -> (usize, usize) {
        let size = grid.size();
        let free = |x: usize, y: usize| grid.get(x as i64, y as i64) == CellType::Empty && !taken.contains(&(x, y));

        let mut threshold = min_distance;
        for round in 0..=self.config.max_relaxations {
            for _ in 0..self.config.placement_attempts {
                let x = rng.gen_range(1..size - 1);
                let y = rng.gen_range(1..size - 1);
                if free(x, y) && cell_distance(x, y, start) > threshold {
                    return (x, y);
                }
            }
            log::warn!(
                "objective placement stalled (round {round}, threshold {threshold:.2}); relaxing to {:.2}",
                threshold * RELAX_FACTOR
            );
            threshold *= RELAX_FACTOR;
        }

        let mut best = None;
        for y in 0..size {
            for x in 0..size {
                if !free(x, y) {
                    continue;
                }
                let d = cell_distance(x, y, start);
                if best.is_none_or(|(_, _, bd)| d > bd) {
                    best = Some((x, y, d));
                }
            }
        }
        match best {
            Some((x, y, _)) => (x, y),
            None => {
                log::warn!("no free empty cell left for an objective; stacking it on the start cell");
                (start, start)
            }
        }
    }
}

fn new_frame(x: usize, y: usize, step: i64, rng: &mut ChaCha8Rng) -> Frame {
    let mut dirs = [(0, -step), (0, step), (-step, 0), (step, 0)];
    dirs.shuffle(rng);
    Frame { x, y, dirs, next: 0 }
}

/// Clears the `(2r+1)²` block centred on `(x, y)`. Returns how many walls it removed.
fn carve_block(grid: &mut Grid, x: usize, y: usize, radius: usize) -> usize {
    let mut carved = 0;
    for by in y - radius..=y + radius {
        for bx in x - radius..=x + radius {
            if grid.get(bx as i64, by as i64) == CellType::Wall {
                grid.set(bx, by, CellType::Empty);
                carved += 1;
            }
        }
    }
    carved
}

#[inline]
fn cell_distance(x: usize, y: usize, start: usize) -> f64 {
    (x as f64 - start as f64).hypot(y as f64 - start as f64)
}

/// Validates `config` and generates one level from it.
pub fn generate(config: &MazeConfig) -> Result<Level, ConfigError> {
    Ok(MazeGenerator::new(config.clone())?.generate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorridorStyle;
    use pretty_assertions::assert_eq;

    fn config(size: usize, corridor: CorridorStyle, seed: u64) -> MazeConfig {
        MazeConfig { size, corridor, seed, ..MazeConfig::default() }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generate(&config(41, CorridorStyle::Narrow, 9)).unwrap();
        let b = generate(&config(41, CorridorStyle::Narrow, 9)).unwrap();
        assert_eq!(a.grid.render_ascii(), b.grid.render_ascii());
        assert_eq!(a.entities, b.entities);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(&config(41, CorridorStyle::Narrow, 1)).unwrap();
        let b = generate(&config(41, CorridorStyle::Narrow, 2)).unwrap();
        assert_ne!(a.grid.render_ascii(), b.grid.render_ascii());
    }

    #[test]
    fn start_is_a_locker_and_border_stays_solid() {
        let level = generate(&config(33, CorridorStyle::Wide, 3)).unwrap();
        let grid = &level.grid;
        assert_eq!(grid.get(16, 16), CellType::Locker);
        assert_eq!(level.spawn(), (16.5, 16.5));
        for i in 0..33 {
            for (x, y) in [(i, 0), (i, 32), (0, i), (32, i)] {
                assert!(grid.get(x, y).is_solid(), "border cell ({x},{y}) is {:?}", grid.get(x, y));
            }
        }
    }

    #[test]
    fn wide_corridors_are_three_cells_across() {
        let mut cfg = config(29, CorridorStyle::Wide, 5);
        cfg.loop_attempts_per_cell = 0;
        cfg.moss_chance = 0.0;
        cfg.vine_chance = 0.0;
        cfg.trap_chance = 0.0;
        let level = generate(&cfg).unwrap();
        // The 3×3 block around the start is always carved.
        for y in 13..=15 {
            for x in 13..=15 {
                assert!(level.grid.get(x, y).is_walkable());
            }
        }
    }

    #[test]
    fn unreachable_threshold_relaxes_instead_of_hanging() {
        let mut cfg = config(9, CorridorStyle::Narrow, 11);
        cfg.key_distance_divisor = 0.01;
        cfg.exit_distance_divisor = 0.01;
        cfg.placement_attempts = 16;
        cfg.max_relaxations = 2;
        cfg.trap_chance = 0.0;
        let level = generate(&cfg).unwrap();
        assert_eq!(level.entities.len(), cfg.total_keys as usize + 1);
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(MazeGenerator::new(config(5, CorridorStyle::Narrow, 0)).is_err());
    }
}
