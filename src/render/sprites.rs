//! Sprite drawing: floor-level billboards for keys, the exit and hostiles,
//! sorted far to near and depth-tested per column against the wall pass.
use crate::config::RenderConfig;
use crate::core::entity::{Entity, EntityKind};
use crate::core::player::Player;
use crate::core::world::WorldState;
use crate::render::framebuffer::{Color, Framebuffer};
use crate::render::render3d::{eye_height, fog_factor, vertical_span};

const KEY_BRIGHT: Color = Color::rgb(234, 179, 8);
const KEY_DIM: Color = Color::rgb(180, 180, 150);
const EXIT: Color = Color::rgb(59, 130, 246);
const HOSTILE: Color = Color::rgb(8, 8, 10);

/// The sprite band covers this slice of its projected height.
const BAND_TOP: f64 = 0.4;
const BAND_HEIGHT: f64 = 0.2;

/// A sprite transformed into camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Depth along the view axis.
    pub depth: f64,
    pub screen_x: f64,
    pub size: f64,
}

/// Camera-space transform via the inverse of the `[dir; plane]` matrix.
/// `None` for anything at or behind the camera.
pub fn project(player: &Player, x: f64, y: f64, screen_w: u32, screen_h: u32) -> Option<Projected> {
    let sx = x - player.x;
    let sy = y - player.y;
    let det = player.plane_x * player.dir_y - player.dir_x * player.plane_y;
    if det.abs() < f64::EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let tx = inv_det * (player.dir_y * sx - player.dir_x * sy);
    let ty = inv_det * (-player.plane_y * sx + player.plane_x * sy);
    if ty <= 0.0 {
        return None;
    }
    Some(Projected {
        depth: ty,
        screen_x: (screen_w as f64 / 2.0) * (1.0 + tx / ty),
        size: (screen_h as f64 / ty).abs(),
    })
}

pub fn sprite_color(kind: EntityKind, animation_time: f64, flicker_hz: f64) -> Color {
    match kind {
        EntityKind::Key => {
            if (animation_time * flicker_hz).fract() < 0.5 { KEY_BRIGHT } else { KEY_DIM }
        }
        EntityKind::Exit => EXIT,
        EntityKind::Hostile => HOSTILE,
    }
}

/// Painter's order: live entities sorted by descending squared distance.
pub fn sorted_far_to_near<'a>(world: &'a WorldState) -> Vec<&'a Entity> {
    let (px, py) = world.player.position();
    let mut sprites: Vec<&Entity> = world.live_entities().collect();
    sprites.sort_by(|a, b| b.distance_sq_to(px, py).total_cmp(&a.distance_sq_to(px, py)));
    sprites
}

pub fn draw_sprites_sorted(
    fb: &mut Framebuffer,
    world: &WorldState,
    config: &RenderConfig,
    zbuffer: &[f64],
    animation_time: f64,
) {
    for entity in sorted_far_to_near(world) {
        let color = sprite_color(entity.kind, animation_time, config.key_flicker_hz);
        draw_sprite_world(fb, &world.player, config, zbuffer, entity.x, entity.y, color);
    }
}

pub fn draw_sprite_world(
    fb: &mut Framebuffer,
    player: &Player,
    config: &RenderConfig,
    zbuffer: &[f64],
    world_x: f64,
    world_y: f64,
    color: Color,
) {
    let Some(p) = project(player, world_x, world_y, fb.width, fb.height) else {
        return;
    };
    let cam_z = eye_height(config, player);
    let (top, bottom) = vertical_span(p.size, cam_z, player.pitch, fb.height);
    let span = (bottom - top) as f64;
    let band_start = (top as f64 + span * BAND_TOP) as u32;
    let band_end = (top as f64 + span * (BAND_TOP + BAND_HEIGHT)).min(fb.height as f64) as u32;

    let start_x = (p.screen_x - p.size / 2.0).floor().max(0.0) as u32;
    let end_x = (p.screen_x + p.size / 2.0).floor().clamp(0.0, fb.width as f64) as u32;
    let alpha = 1.0 - fog_factor(config, p.depth);
    if alpha <= 0.0 {
        return;
    }

    for x in start_x..end_x {
        if p.depth >= zbuffer.get(x as usize).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        for y in band_start..band_end {
            fb.blend_pixel(x, y, color, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn sprite_straight_ahead_projects_to_centre() {
        let p = Player::spawn((1.5, 1.5), &GameConfig::default());
        let proj = project(&p, 4.5, 1.5, 640, 480).unwrap();
        assert!((proj.depth - 3.0).abs() < 1e-9);
        assert!((proj.screen_x - 320.0).abs() < 1e-9);
        assert!((proj.size - 160.0).abs() < 1e-9);
    }

    #[test]
    fn sprite_behind_is_culled() {
        let p = Player::spawn((5.5, 5.5), &GameConfig::default());
        assert!(project(&p, 2.5, 5.5, 640, 480).is_none());
        assert!(project(&p, 5.5, 5.5, 640, 480).is_none());
    }

    #[test]
    fn key_flickers_between_two_tints() {
        let a = sprite_color(EntityKind::Key, 0.0, 4.0);
        let b = sprite_color(EntityKind::Key, 0.2, 4.0);
        assert_ne!(a, b);
        assert_eq!(sprite_color(EntityKind::Key, 0.25, 4.0), a);
        assert_eq!(sprite_color(EntityKind::Exit, 0.2, 4.0), sprite_color(EntityKind::Exit, 0.0, 4.0));
    }
}
