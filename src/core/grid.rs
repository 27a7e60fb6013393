//! Cell types and the fixed-size square grid they live in.
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Empty,
    Wall,
    MossWall,
    /// Climbable.
    VineWall,
    /// Spawn point; the player can hide inside.
    Locker,
    /// Walkable, but hurts.
    Trap,
}

impl CellType {
    /// Cells the player may stand in while on the ground.
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, CellType::Empty | CellType::Locker | CellType::Trap)
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, CellType::Wall | CellType::MossWall | CellType::VineWall)
    }

    /// Cells a ray stops at. Traps sit on the floor and let rays through.
    #[inline]
    pub fn stops_ray(self) -> bool {
        !matches!(self, CellType::Empty | CellType::Trap)
    }

    pub fn to_char(self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Wall => '#',
            CellType::MossWall => 'M',
            CellType::VineWall => 'V',
            CellType::Locker => 'L',
            CellType::Trap => 'T',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<CellType>,
    spawn: (f64, f64),
}

impl Grid {
    /// A `size × size` grid of walls with the spawn at the centre cell.
    pub fn filled(size: usize, cell: CellType) -> Self {
        let c = (size / 2) as f64 + 0.5;
        Self { size, cells: vec![cell; size * size], spawn: (c, c) }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn spawn(&self) -> (f64, f64) {
        self.spawn
    }

    pub(crate) fn set_spawn(&mut self, spawn: (f64, f64)) {
        self.spawn = spawn;
    }

    /// The cell containing `spawn`.
    pub fn spawn_cell(&self) -> (usize, usize) {
        (self.spawn.0.floor() as usize, self.spawn.1.floor() as usize)
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    /// Bounds-checked read. Anything outside the grid is an implicit wall.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> CellType {
        if self.in_bounds(x, y) {
            self.cells[self.idx(x as usize, y as usize)]
        } else {
            CellType::Wall
        }
    }

    /// The cell under a world-space position.
    #[inline]
    pub fn cell_at(&self, x: f64, y: f64) -> CellType {
        self.get(x.floor() as i64, y.floor() as i64)
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, cell: CellType) {
        let i = self.idx(x, y);
        self.cells[i] = cell;
    }

    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// 4-neighbours of `(x, y)` that lie inside the grid.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        const DIRS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        DIRS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// Flood fill from the spawn cell over walkable cells.
    pub fn reachable_from_spawn(&self) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        let (sx, sy) = self.spawn_cell();
        if !self.get(sx as i64, sy as i64).is_walkable() {
            return seen;
        }
        let mut queue = VecDeque::new();
        seen[self.idx(sx, sy)] = true;
        queue.push_back((sx, sy));
        while let Some((cx, cy)) = queue.pop_front() {
            for (nx, ny) in self.neighbors(cx, cy) {
                let i = self.idx(nx, ny);
                if !seen[i] && self.cells[i].is_walkable() {
                    seen[i] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        seen
    }

    /// Every Empty cell can be reached from spawn.
    pub fn is_connected(&self) -> bool {
        let seen = self.reachable_from_spawn();
        self.cells
            .iter()
            .zip(&seen)
            .all(|(&cell, &reached)| cell != CellType::Empty || reached)
    }

    /// Text dump, one row per line, using the same tiles the map loader reads.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in self.cells.chunks(self.size) {
            out.extend(row.iter().map(|c| c.to_char()));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_indexing() {
        let grid = Grid::filled(5, CellType::Wall);
        assert_eq!(grid.idx(0, 0), 0);
        assert_eq!(grid.idx(4, 0), 4);
        assert_eq!(grid.idx(0, 1), 5);
        assert_eq!(grid.idx(3, 2), 13);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::filled(3, CellType::Empty);
        assert_eq!(grid.get(-1, 0), CellType::Wall);
        assert_eq!(grid.get(0, 3), CellType::Wall);
        assert_eq!(grid.cell_at(-0.2, 1.0), CellType::Wall);
        assert_eq!(grid.get(1, 1), CellType::Empty);
    }

    #[test]
    fn isolated_pocket_is_not_connected() {
        let mut grid = Grid::filled(7, CellType::Wall);
        grid.set(3, 3, CellType::Locker);
        grid.set(4, 3, CellType::Trap);
        grid.set(5, 3, CellType::Empty);
        assert!(grid.is_connected());

        grid.set(1, 1, CellType::Empty);
        assert!(!grid.is_connected());
    }

    #[test]
    fn traps_do_not_stop_rays_but_vines_do() {
        assert!(!CellType::Trap.stops_ray());
        assert!(CellType::VineWall.stops_ray());
        assert!(CellType::Locker.stops_ray());
        assert!(CellType::Trap.is_walkable());
        assert!(!CellType::VineWall.is_walkable());
    }
}
