use crate::config::GameConfig;
use crate::core::entity::{Entity, EntityKind};
use crate::core::generator::{Level, MazeGenerator};
use crate::core::grid::Grid;
use crate::core::player::Player;
use crate::error::ConfigError;

/// Everything one play session mutates. Only the player controller writes to
/// it; the renderer borrows it read-only.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub grid: Grid,
    pub entities: Vec<Entity>,
    pub player: Player,
}

impl WorldState {
    /// Fresh session: generates a maze from `config.maze` and spawns the player in its locker.
    pub fn generate(config: &GameConfig) -> Result<Self, ConfigError> {
        let level = MazeGenerator::new(config.maze.clone())?.generate();
        Ok(Self::from_level(level, config))
    }

    pub fn from_level(level: Level, config: &GameConfig) -> Self {
        let player = Player::spawn(level.grid.spawn(), config);
        Self { grid: level.grid, entities: level.entities, player }
    }

    /// Entities still on the playfield.
    pub fn live_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.is_removed())
    }

    pub fn count_live(&self, kind: EntityKind) -> usize {
        self.live_entities().filter(|e| e.kind == kind).count()
    }
}
