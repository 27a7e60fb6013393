//! Start-time configuration.
//!
//! Every field has a default so a TOML file only needs to name what it overrides:
//!
//! ```toml
//! [maze]
//! seed = 42
//! corridor = "wide"
//!
//! [render]
//! texture_style = "flat"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub render: RenderConfig,
    pub maze: MazeConfig,
    pub movement: MovementTuning,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { width: 640, height: 480 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureStyle {
    /// Grain, cracks, moss patches, vine strands, locker frames.
    Detailed,
    /// One palette colour per cell type.
    Flat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Length of the camera-plane vector (tangent of half the field of view).
    pub fov: f64,
    pub wall_height_scale: f64,
    /// Eye height as a fraction of a wall, standing on the ground.
    pub eye_height: f64,
    pub crouch_eye_drop: f64,
    pub fog_start: f64,
    pub fog_range: f64,
    pub max_ray_steps: u32,
    pub texture_style: TextureStyle,
    pub key_flicker_hz: f64,
    /// Time-keyed per-pixel brightness perturbation on walls.
    pub sparkle: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov: 0.86,
            wall_height_scale: 4.0,
            eye_height: 0.41,
            crouch_eye_drop: 0.2,
            fog_start: 2.0,
            fog_range: 10.0,
            max_ray_steps: 150,
            texture_style: TextureStyle::Detailed,
            key_flicker_hz: 4.0,
            sparkle: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorridorStyle {
    /// One-cell corridors, carving step 2.
    Narrow,
    /// Three-cell corridors, carving step 4.
    Wide,
}

impl CorridorStyle {
    /// Half-width of the carved block around each visited cell.
    pub fn radius(self) -> usize {
        match self {
            CorridorStyle::Narrow => 0,
            CorridorStyle::Wide => 1,
        }
    }

    /// Distance between visited cells.
    pub fn step(self) -> usize {
        match self {
            CorridorStyle::Narrow => 2,
            CorridorStyle::Wide => 4,
        }
    }

    /// Smallest grid that still carves at least one corridor out of the start cell.
    pub fn min_size(self) -> usize {
        match self {
            CorridorStyle::Narrow => 9,
            CorridorStyle::Wide => 13,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MazeConfig {
    pub size: usize,
    pub total_keys: u32,
    pub seed: u64,
    pub corridor: CorridorStyle,
    pub loop_attempts_per_cell: usize,
    pub moss_chance: f64,
    pub vine_chance: f64,
    pub trap_chance: f64,
    /// No traps closer than this to spawn.
    pub trap_safe_radius: f64,
    /// Keys must be further than `size / key_distance_divisor` from spawn.
    pub key_distance_divisor: f64,
    /// The exit must be further than `size / exit_distance_divisor` from spawn.
    pub exit_distance_divisor: f64,
    /// Rejection-sampling draws per objective before the threshold is relaxed.
    pub placement_attempts: usize,
    pub max_relaxations: usize,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: 80,
            total_keys: 3,
            seed: 0,
            corridor: CorridorStyle::Narrow,
            loop_attempts_per_cell: 5,
            moss_chance: 0.05,
            vine_chance: 0.05,
            trap_chance: 0.01,
            trap_safe_radius: 4.0,
            key_distance_divisor: 3.0,
            exit_distance_divisor: 2.1,
            placement_attempts: 4096,
            max_relaxations: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementTuning {
    /// Cells per reference tick.
    pub move_speed: f64,
    /// Radians per reference tick for keyboard turning.
    pub rot_speed: f64,
    pub run_multiplier: f64,
    pub crouch_multiplier: f64,
    /// How far ahead (as a multiple of this tick's displacement) collisions are probed.
    pub collision_lookahead: f64,
    pub noise_run: f64,
    pub noise_walk: f64,
    pub noise_crouch: f64,
    /// Multiplicative noise decay applied on ticks without displacement.
    pub noise_decay: f64,
    /// Health lost per reference tick while standing on a trap.
    pub trap_damage: f64,
    pub key_pickup_radius: f64,
    pub exit_radius: f64,
    /// Height gained per reference tick while climbing.
    pub climb_speed: f64,
    /// How far along the facing direction a vine wall can be grabbed.
    pub climb_reach: f64,
    /// Height above which a climber may walk onto the top of the wall.
    pub climb_top: f64,
    /// Radians per pointer pixel.
    pub rotation_sensitivity: f64,
    /// Pitch pixels per pointer pixel.
    pub pitch_sensitivity: f64,
    /// How many updates a transient message stays visible.
    pub message_ticks: u32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 0.05,
            rot_speed: 0.03,
            run_multiplier: 1.8,
            crouch_multiplier: 0.5,
            collision_lookahead: 2.0,
            noise_run: 1.0,
            noise_walk: 0.4,
            noise_crouch: 0.1,
            noise_decay: 0.8,
            trap_damage: 0.5,
            key_pickup_radius: 0.7,
            exit_radius: 1.2,
            climb_speed: 0.02,
            climb_reach: 1.0,
            climb_top: 0.9,
            rotation_sensitivity: 0.002,
            pitch_sensitivity: 2.0,
            message_ticks: 120,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::invalid("screen", "width and height must be non-zero"));
        }
        self.render.validate()?;
        self.maze.validate()?;
        self.movement.validate()
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must lie in [0, 1]")))
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("render.fov", self.fov)?;
        positive("render.wall_height_scale", self.wall_height_scale)?;
        positive("render.fog_range", self.fog_range)?;
        if self.max_ray_steps == 0 {
            return Err(ConfigError::invalid("render.max_ray_steps", "must be at least 1"));
        }
        Ok(())
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.corridor.min_size();
        if self.size < min {
            return Err(ConfigError::invalid(
                "maze.size",
                format!("{} is below the minimum of {min} for {:?} corridors", self.size, self.corridor),
            ));
        }
        if self.total_keys == 0 {
            return Err(ConfigError::invalid("maze.total_keys", "at least one key is required"));
        }
        probability("maze.moss_chance", self.moss_chance)?;
        probability("maze.vine_chance", self.vine_chance)?;
        probability("maze.trap_chance", self.trap_chance)?;
        if self.moss_chance + self.vine_chance > 1.0 {
            return Err(ConfigError::invalid("maze.vine_chance", "moss_chance + vine_chance exceeds 1"));
        }
        positive("maze.key_distance_divisor", self.key_distance_divisor)?;
        positive("maze.exit_distance_divisor", self.exit_distance_divisor)?;
        if self.placement_attempts == 0 {
            return Err(ConfigError::invalid("maze.placement_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

impl MovementTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("movement.move_speed", self.move_speed)?;
        positive("movement.run_multiplier", self.run_multiplier)?;
        positive("movement.crouch_multiplier", self.crouch_multiplier)?;
        positive("movement.collision_lookahead", self.collision_lookahead)?;
        positive("movement.key_pickup_radius", self.key_pickup_radius)?;
        positive("movement.exit_radius", self.exit_radius)?;
        positive("movement.climb_speed", self.climb_speed)?;
        if !(self.noise_decay > 0.0 && self.noise_decay < 1.0) {
            return Err(ConfigError::invalid("movement.noise_decay", "must lie strictly between 0 and 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = GameConfig::from_toml_str(
            r#"
            [maze]
            seed = 7
            corridor = "wide"

            [render]
            texture_style = "flat"
            "#,
        )
        .unwrap();
        assert_eq!(config.maze.seed, 7);
        assert_eq!(config.maze.corridor, CorridorStyle::Wide);
        assert_eq!(config.maze.size, 80);
        assert_eq!(config.render.texture_style, TextureStyle::Flat);
        assert_eq!(config.movement, MovementTuning::default());
    }

    #[test]
    fn rejects_tiny_wide_maze() {
        let err = GameConfig::from_toml_str("[maze]\nsize = 11\ncorridor = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "maze.size", .. }));
    }

    #[test]
    fn rejects_non_decaying_noise() {
        let err = GameConfig::from_toml_str("[movement]\nnoise_decay = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "movement.noise_decay", .. }));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = GameConfig::from_toml_str("[maze]\nsizee = 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
