//! Grid ray marching (DDA).
use crate::core::grid::{CellType, Grid};
use crate::core::player::Player;

/// Closest a wall may be treated as, so slice heights stay finite.
pub const MIN_PERP_DISTANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance projected onto the camera's forward axis (no fisheye).
    pub perp_distance: f64,
    /// 0 when a vertical grid line (x = const) was crossed, 1 for a horizontal one.
    pub side: u8,
    pub cell: CellType,
    pub map_x: i64,
    pub map_y: i64,
    /// Where along the hit face the ray landed, in [0, 1).
    pub wall_x: f64,
}

/// Camera-space ray for screen column `column` of `width`.
#[inline]
pub fn camera_ray(player: &Player, column: u32, width: u32) -> (f64, f64) {
    let camera_x = 2.0 * column as f64 / width as f64 - 1.0;
    (player.dir_x + player.plane_x * camera_x, player.dir_y + player.plane_y * camera_x)
}

/// Marches from `(px, py)` along `(ray_x, ray_y)` until a cell that stops rays.
/// Leaving the grid counts as hitting an implicit wall. Returns `None` once
/// `max_steps` cells have been crossed without a hit.
pub fn cast_ray(grid: &Grid, px: f64, py: f64, ray_x: f64, ray_y: f64, max_steps: u32) -> Option<RayHit> {
    let mut map_x = px.floor() as i64;
    let mut map_y = py.floor() as i64;

    let delta_x = if ray_x == 0.0 { f64::INFINITY } else { (1.0 / ray_x).abs() };
    let delta_y = if ray_y == 0.0 { f64::INFINITY } else { (1.0 / ray_y).abs() };

    let (step_x, mut side_x) = if ray_x < 0.0 {
        (-1, (px - map_x as f64) * delta_x)
    } else {
        (1, (map_x as f64 + 1.0 - px) * delta_x)
    };
    let (step_y, mut side_y) = if ray_y < 0.0 {
        (-1, (py - map_y as f64) * delta_y)
    } else {
        (1, (map_y as f64 + 1.0 - py) * delta_y)
    };
    // 0 * inf is NaN; an axis the ray never crosses is infinitely far away.
    if delta_x.is_infinite() {
        side_x = f64::INFINITY;
    }
    if delta_y.is_infinite() {
        side_y = f64::INFINITY;
    }

    let mut side = 0u8;
    for _ in 0..max_steps {
        if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            side = 0;
        } else {
            side_y += delta_y;
            map_y += step_y;
            side = 1;
        }

        let cell = grid.get(map_x, map_y);
        if !cell.stops_ray() {
            continue;
        }

        let perp = if side == 0 {
            (map_x as f64 - px + (1 - step_x) as f64 / 2.0) / ray_x
        } else {
            (map_y as f64 - py + (1 - step_y) as f64 / 2.0) / ray_y
        };
        let perp = perp.max(MIN_PERP_DISTANCE);
        let hit_along = if side == 0 { py + perp * ray_y } else { px + perp * ray_x };
        return Some(RayHit {
            perp_distance: perp,
            side,
            cell,
            map_x,
            map_y,
            wall_x: hit_along - hit_along.floor(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::maze::parse_level;

    #[test]
    fn axis_aligned_ray_hits_the_facing_wall() {
        let level = parse_level("#####\n#L  #\n#####\n").unwrap();
        let hit = cast_ray(&level.grid, 1.5, 1.5, 1.0, 0.0, 50).unwrap();
        assert_eq!((hit.map_x, hit.map_y, hit.side), (4, 1, 0));
        assert!((hit.perp_distance - 2.5).abs() < 1e-9);
        assert!((hit.wall_x - 0.5).abs() < 1e-9);
    }

    #[test]
    fn leaving_the_grid_is_a_wall_hit() {
        let level = parse_level("L   \n").unwrap();
        let hit = cast_ray(&level.grid, 0.5, 0.5, 1.0, 0.0, 50).unwrap();
        assert_eq!(hit.cell, CellType::Wall);
        assert_eq!(hit.map_x, 4);
    }

    #[test]
    fn traps_are_see_through() {
        let level = parse_level("######\n#LTT #\n######\n").unwrap();
        let hit = cast_ray(&level.grid, 1.5, 1.5, 1.0, 0.0, 50).unwrap();
        assert_eq!(hit.map_x, 5);
    }

    #[test]
    fn step_budget_bounds_the_march() {
        let level = parse_level("#########\n#L      #\n#########\n").unwrap();
        assert!(cast_ray(&level.grid, 1.5, 1.5, 1.0, 0.0, 3).is_none());
        assert!(cast_ray(&level.grid, 1.5, 1.5, 1.0, 0.0, 7).is_some());
    }
}
