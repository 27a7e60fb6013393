use crate::config::GameConfig;

/// Which movement rules apply this tick. Derived from the player's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    InLocker,
    Exploring,
    Climbing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub dir_x: f64,
    pub dir_y: f64,
    pub plane_x: f64,
    pub plane_y: f64,
    /// Climbing height, 0 on the ground and 1 on top of a wall.
    pub z: f64,
    /// Vertical look offset in screen pixels.
    pub pitch: f64,
    pub health: f64,
    pub keys_found: u32,
    pub is_crouching: bool,
    pub is_in_locker: bool,
    pub is_climbing: bool,
    pub noise_level: f64,
    pub move_speed: f64,
    pub rot_speed: f64,
}

pub const MAX_HEALTH: f64 = 100.0;

impl Player {
    /// Standing in the spawn locker, facing +x.
    pub fn spawn(at: (f64, f64), config: &GameConfig) -> Self {
        Self {
            x: at.0,
            y: at.1,
            dir_x: 1.0,
            dir_y: 0.0,
            plane_x: 0.0,
            plane_y: config.render.fov,
            z: 0.0,
            pitch: 0.0,
            health: MAX_HEALTH,
            keys_found: 0,
            is_crouching: false,
            is_in_locker: true,
            is_climbing: false,
            noise_level: 0.0,
            move_speed: config.movement.move_speed,
            rot_speed: config.movement.rot_speed,
        }
    }

    pub fn mode(&self) -> PlayerMode {
        if self.is_in_locker {
            PlayerMode::InLocker
        } else if self.is_climbing {
            PlayerMode::Climbing
        } else {
            PlayerMode::Exploring
        }
    }

    /// Rotates facing and camera plane together so they stay orthogonal.
    pub fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let old_dir_x = self.dir_x;
        self.dir_x = self.dir_x * cos - self.dir_y * sin;
        self.dir_y = old_dir_x * sin + self.dir_y * cos;
        let old_plane_x = self.plane_x;
        self.plane_x = self.plane_x * cos - self.plane_y * sin;
        self.plane_y = old_plane_x * sin + self.plane_y * cos;
    }

    pub fn add_pitch(&mut self, delta: f64, limit: f64) {
        self.pitch = (self.pitch + delta).clamp(-limit, limit);
    }

    #[inline]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    #[inline]
    pub fn cell(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_plane_orthogonal_and_sized() {
        let config = GameConfig::default();
        let mut p = Player::spawn((1.5, 1.5), &config);
        for step in 0..500 {
            p.rotate(0.013 * step as f64);
        }
        let dot = p.dir_x * p.plane_x + p.dir_y * p.plane_y;
        let dir_len = p.dir_x.hypot(p.dir_y);
        let plane_len = p.plane_x.hypot(p.plane_y);
        assert!(dot.abs() < 1e-9, "dot = {dot}");
        assert!((dir_len - 1.0).abs() < 1e-9);
        assert!((plane_len - config.render.fov).abs() < 1e-9);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut p = Player::spawn((1.5, 1.5), &GameConfig::default());
        p.add_pitch(1_000.0, 240.0);
        assert_eq!(p.pitch, 240.0);
        p.add_pitch(-5_000.0, 240.0);
        assert_eq!(p.pitch, -240.0);
    }

    #[test]
    fn starts_hidden() {
        let p = Player::spawn((1.5, 1.5), &GameConfig::default());
        assert_eq!(p.mode(), PlayerMode::InLocker);
    }
}
