//! 3D renderer: sky and ground, textured wall columns with fog, then sprites.
use crate::config::RenderConfig;
use crate::core::player::Player;
use crate::core::world::WorldState;
use crate::render::casters::{cast_ray, camera_ray};
use crate::render::framebuffer::{Color, Framebuffer};
use crate::render::sprites::draw_sprites_sorted;
use crate::render::textures::{self, CEILING, FOG, GROUND, TEXTURE_SIZE};

/// Fog blend factor for something `distance` away.
#[inline]
pub fn fog_factor(config: &RenderConfig, distance: f64) -> f64 {
    ((distance - config.fog_start) / config.fog_range).clamp(0.0, 1.0)
}

/// Eye height as a fraction of wall height: base height, plus climbing, minus crouch.
#[inline]
pub fn eye_height(config: &RenderConfig, player: &Player) -> f64 {
    let crouch = if player.is_crouching { config.crouch_eye_drop } else { 0.0 };
    config.eye_height + player.z - crouch
}

/// Screen rows `[start, end)` covered by an object of projected height `line_height`.
#[inline]
pub fn vertical_span(line_height: f64, cam_z: f64, pitch: f64, screen_h: u32) -> (u32, u32) {
    let h = screen_h as f64;
    let horizon = h / 2.0 + pitch;
    let start = (-line_height * (1.0 - cam_z) + horizon).floor().clamp(0.0, h);
    let end = (line_height * cam_z + horizon).floor().clamp(0.0, h);
    (start as u32, end.max(start) as u32)
}

pub struct RaycastRenderer {
    config: RenderConfig,
    zbuffer: Vec<f64>,
}

impl RaycastRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config, zbuffer: Vec::new() }
    }

    /// Per-column wall depth from the last frame. Infinite where no wall was hit.
    pub fn depth_buffer(&self) -> &[f64] {
        &self.zbuffer
    }

    /// Draws one frame. Reads `world` only and writes every pixel of `fb`.
    /// `animation_time` (seconds) drives key flicker, slime shimmer and sparkle.
    pub fn render(&mut self, world: &WorldState, fb: &mut Framebuffer, animation_time: f64) {
        self.zbuffer.clear();
        self.zbuffer.resize(fb.width as usize, f64::INFINITY);

        paint_ceiling_and_floor(fb, world.player.pitch);
        self.draw_walls(world, fb, animation_time);
        draw_sprites_sorted(fb, world, &self.config, &self.zbuffer, animation_time);
        log::trace!("frame rendered at t={animation_time:.3}");
    }

    fn draw_walls(&mut self, world: &WorldState, fb: &mut Framebuffer, animation_time: f64) {
        let player = &world.player;
        let cfg = &self.config;
        let h = fb.height as f64;
        let cam_z = eye_height(cfg, player);

        for x in 0..fb.width {
            let (ray_x, ray_y) = camera_ray(player, x, fb.width);
            let Some(hit) = cast_ray(&world.grid, player.x, player.y, ray_x, ray_y, cfg.max_ray_steps) else {
                continue;
            };
            self.zbuffer[x as usize] = hit.perp_distance;

            let line_height = h / hit.perp_distance * cfg.wall_height_scale;
            let (start, end) = vertical_span(line_height, cam_z, player.pitch, fb.height);

            let mut tex_x = (hit.wall_x * TEXTURE_SIZE as f64) as u32;
            if (hit.side == 0 && ray_x > 0.0) || (hit.side == 1 && ray_y < 0.0) {
                tex_x = TEXTURE_SIZE - 1 - tex_x.min(TEXTURE_SIZE - 1);
            }
            let fog = fog_factor(cfg, hit.perp_distance);
            let top = h / 2.0 + player.pitch - line_height * (1.0 - cam_z);

            for y in start..end {
                let v = (y as f64 - top) / line_height;
                let tex_y = ((v * TEXTURE_SIZE as f64) as i64).rem_euclid(TEXTURE_SIZE as i64) as u32;
                let mut color =
                    textures::sample_wall(hit.cell, tex_x, tex_y, hit.side, cfg.texture_style, animation_time);
                if fog > 0.0 {
                    color = color.lerp(FOG, fog);
                }
                if cfg.sparkle && textures::sparkles(x, y, animation_time) {
                    color = color.brighten(12);
                }
                fb.set_pixel(x, y, color);
            }
        }
    }
}

/// Ceiling above the horizon and ground below it, both fading into fog at the horizon.
fn paint_ceiling_and_floor(fb: &mut Framebuffer, pitch: f64) {
    let h = fb.height as f64;
    let horizon = h / 2.0 + pitch;
    for y in 0..fb.height {
        let yf = y as f64 + 0.5;
        let color = if yf < horizon {
            let t = (horizon - yf) / horizon.max(1.0);
            FOG.lerp(CEILING, t)
        } else {
            let t = (yf - horizon) / (h - horizon).max(1.0);
            FOG.lerp(GROUND, t)
        };
        fb.fill_row(y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fog_is_clamped() {
        let cfg = RenderConfig::default();
        assert_eq!(fog_factor(&cfg, 0.5), 0.0);
        assert!((fog_factor(&cfg, 7.0) - 0.5).abs() < 1e-12);
        assert_eq!(fog_factor(&cfg, 100.0), 1.0);
    }

    #[test]
    fn span_stays_on_screen() {
        let (start, end) = vertical_span(10_000.0, 0.41, 0.0, 480);
        assert_eq!((start, end), (0, 480));
        let (start, end) = vertical_span(100.0, 0.41, 0.0, 480);
        assert!(start > 0 && end < 480 && start < end);
    }

    #[test]
    fn crouching_lowers_the_eye() {
        let cfg = RenderConfig::default();
        let mut p = Player::spawn((1.5, 1.5), &crate::config::GameConfig::default());
        let standing = eye_height(&cfg, &p);
        p.is_crouching = true;
        assert!(eye_height(&cfg, &p) < standing);
    }
}
