//! Player movement, collision and interaction.
//!
//! One `update` per frame: look, then mode-specific movement (locker, walking,
//! climbing), then the ground invariant, traps, entity pickups and finally the
//! victory / defeat edges that the host's game-state machine consumes.

use crate::config::{GameConfig, MovementTuning};
use crate::core::entity::EntityKind;
use crate::core::grid::{CellType, Grid};
use crate::core::input::{Action, ActionSet, InputSnapshot};
use crate::core::player::{Player, PlayerMode};
use crate::core::world::WorldState;

/// Movement values in [`MovementTuning`] are per tick at this rate.
pub const REFERENCE_TICK_HZ: f64 = 60.0;
/// A long stall never turns into a teleport through a wall.
const MAX_TICKS_PER_UPDATE: f64 = 3.0;
/// Backing down below this height lets go of the wall.
const CLIMB_RELEASE_HEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    LeftLocker,
    EnteredLocker,
    StartedClimbing,
    StoppedClimbing,
    KeyCollected { id: u32, found: u32, total: u32 },
    ExitLocked { missing: u32 },
    EnteredTrap,
    Victory,
    Defeat,
}

/// Transient status text for the HUD, counted down once per update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub ticks_left: u32,
}

pub struct PlayerController {
    tuning: MovementTuning,
    total_keys: u32,
    pitch_limit: f64,
    prev_held: ActionSet,
    last_ground: Option<(f64, f64)>,
    on_trap: bool,
    near_exit: bool,
    victory_latched: bool,
    defeat_latched: bool,
    message: Option<Message>,
    events: Vec<PlayerEvent>,
}

impl PlayerController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            tuning: config.movement.clone(),
            total_keys: config.maze.total_keys,
            pitch_limit: config.screen.height as f64 / 2.0,
            prev_held: ActionSet::empty(),
            last_ground: None,
            on_trap: false,
            near_exit: false,
            victory_latched: false,
            defeat_latched: false,
            message: None,
            events: Vec::new(),
        }
    }

    pub fn total_keys(&self) -> u32 {
        self.total_keys
    }

    /// Current transient message, if one is still showing.
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    /// What happened during the last `update`.
    pub fn events(&self) -> &[PlayerEvent] {
        &self.events
    }

    /// Advances the player by one frame of `dt` seconds. Returns an outcome only
    /// on the update where its condition first becomes true.
    pub fn update(&mut self, world: &mut WorldState, input: &InputSnapshot, dt: f64) -> Option<Outcome> {
        self.events.clear();
        self.tick_message();

        let ticks = (dt * REFERENCE_TICK_HZ).clamp(0.0, MAX_TICKS_PER_UPDATE);
        let interact = self.just_pressed(input, Action::Interact);
        let climb = self.just_pressed(input, Action::Climb);
        self.prev_held = input.held;

        if self.last_ground.is_none() {
            self.last_ground = Some(world.player.position());
        }

        self.look(&mut world.player, input, ticks);

        match world.player.mode() {
            PlayerMode::InLocker => {
                let player = &mut world.player;
                player.is_crouching = false;
                if interact {
                    player.is_in_locker = false;
                    self.emit(PlayerEvent::LeftLocker, "STASIS DISRUPTED // RUN");
                    log::info!("player left the locker at ({:.2}, {:.2})", player.x, player.y);
                }
                self.apply_noise(&mut world.player, 0.0, input);
            }
            PlayerMode::Exploring => {
                let standing_on = world.grid.cell_at(world.player.x, world.player.y);
                if interact && standing_on == CellType::Locker {
                    let player = &mut world.player;
                    player.is_in_locker = true;
                    player.is_crouching = false;
                    player.noise_level = 0.0;
                    self.emit(PlayerEvent::EnteredLocker, "HIDDEN");
                } else if climb && self.facing_vine(&world.grid, &world.player) {
                    world.player.is_climbing = true;
                    world.player.is_crouching = false;
                    self.emit(PlayerEvent::StartedClimbing, "CLIMBING");
                } else {
                    world.player.is_crouching = input.is_held(Action::Crouch);
                    let moved = self.walk(&world.grid, &mut world.player, input, ticks, CellType::is_walkable);
                    self.apply_noise(&mut world.player, moved, input);
                }
            }
            PlayerMode::Climbing => self.climb(world, input, ticks),
        }

        self.enforce_ground(world);
        self.check_trap(world, ticks);
        let victory = self.interact_with_entities(world);
        self.resolve_outcome(&world.player, victory)
    }

    fn just_pressed(&self, input: &InputSnapshot, action: Action) -> bool {
        input.is_held(action) && !self.prev_held.contains(action)
    }

    fn look(&self, player: &mut Player, input: &InputSnapshot, ticks: f64) {
        if let Some(pointer) = input.pointer {
            player.rotate(pointer.dx * self.tuning.rotation_sensitivity);
            player.add_pitch(-pointer.dy * self.tuning.pitch_sensitivity, self.pitch_limit);
        }
        if input.is_held(Action::TurnRight) {
            player.rotate(player.rot_speed * ticks);
        }
        if input.is_held(Action::TurnLeft) {
            player.rotate(-player.rot_speed * ticks);
        }
    }

    /// Axis-separated move. Each axis is tried on its own so a blocked axis
    /// still lets the player slide along the wall. Returns the distance covered.
    fn walk(
        &self,
        grid: &Grid,
        player: &mut Player,
        input: &InputSnapshot,
        ticks: f64,
        passable: impl Fn(CellType) -> bool,
    ) -> f64 {
        let mut speed = player.move_speed * ticks;
        if input.is_held(Action::Run) {
            speed *= self.tuning.run_multiplier;
        }
        if player.is_crouching {
            speed *= self.tuning.crouch_multiplier;
        }

        let plane_len = player.plane_x.hypot(player.plane_y).max(f64::EPSILON);
        let (side_x, side_y) = (player.plane_x / plane_len, player.plane_y / plane_len);
        let (mut dx, mut dy) = (0.0, 0.0);
        if input.is_held(Action::Forward) {
            dx += player.dir_x * speed;
            dy += player.dir_y * speed;
        }
        if input.is_held(Action::Backward) {
            dx -= player.dir_x * speed;
            dy -= player.dir_y * speed;
        }
        if input.is_held(Action::StrafeRight) {
            dx += side_x * speed;
            dy += side_y * speed;
        }
        if input.is_held(Action::StrafeLeft) {
            dx -= side_x * speed;
            dy -= side_y * speed;
        }

        let look = self.tuning.collision_lookahead;
        let (start_x, start_y) = player.position();
        if dx != 0.0
            && passable(grid.cell_at(player.x + dx, player.y))
            && passable(grid.cell_at(player.x + dx * look, player.y))
        {
            player.x += dx;
        }
        if dy != 0.0
            && passable(grid.cell_at(player.x, player.y + dy))
            && passable(grid.cell_at(player.x, player.y + dy * look))
        {
            player.y += dy;
        }
        (player.x - start_x).hypot(player.y - start_y)
    }

    fn climb(&mut self, world: &mut WorldState, input: &InputSnapshot, ticks: f64) {
        let player = &mut world.player;
        player.is_crouching = false;
        let rate = self.tuning.climb_speed * ticks;
        if input.is_held(Action::Forward) {
            player.z = (player.z + rate).min(1.0);
        }
        if input.is_held(Action::Backward) {
            player.z = (player.z - rate).max(0.0);
            if player.z <= CLIMB_RELEASE_HEIGHT {
                player.z = 0.0;
                player.is_climbing = false;
                self.emit(PlayerEvent::StoppedClimbing, "BACK ON THE GROUND");
                self.apply_noise(&mut world.player, 0.0, input);
                return;
            }
        }

        let mut moved = 0.0;
        if player.z >= self.tuning.climb_top {
            let from = player.cell();
            moved = self.walk(&world.grid, player, input, ticks, |cell| {
                cell.is_walkable() || cell == CellType::VineWall
            });
            // Only vine cells carry a climber; stepping into any other floor cell drops them.
            let to = player.cell();
            if to != from && world.grid.get(to.0, to.1).is_walkable() {
                player.z = 0.0;
                player.is_climbing = false;
                self.emit(PlayerEvent::StoppedClimbing, "DROPPED DOWN");
            }
        }
        self.apply_noise(&mut world.player, moved, input);
    }

    fn facing_vine(&self, grid: &Grid, player: &Player) -> bool {
        let reach = self.tuning.climb_reach;
        [reach * 0.5, reach].iter().any(|&d| {
            grid.cell_at(player.x + player.dir_x * d, player.y + player.dir_y * d) == CellType::VineWall
        })
    }

    fn apply_noise(&self, player: &mut Player, moved: f64, input: &InputSnapshot) {
        player.noise_level = if moved > 0.0 {
            if input.is_held(Action::Run) {
                self.tuning.noise_run
            } else if player.is_crouching {
                self.tuning.noise_crouch
            } else {
                self.tuning.noise_walk
            }
        } else {
            player.noise_level * self.tuning.noise_decay
        };
    }

    /// On the ground the player must occupy a walkable cell. If that ever fails,
    /// put them back where they last stood legally.
    fn enforce_ground(&mut self, world: &mut WorldState) {
        let player = &mut world.player;
        let cell = world.grid.cell_at(player.x, player.y);
        if cell.is_walkable() {
            if !player.is_climbing || player.z == 0.0 {
                self.last_ground = Some(player.position());
            }
            return;
        }
        if player.is_climbing && cell == CellType::VineWall {
            return;
        }
        if let Some((x, y)) = self.last_ground {
            log::warn!(
                "player ended up inside {cell:?} at ({:.2}, {:.2}); restoring ({x:.2}, {y:.2})",
                player.x,
                player.y
            );
            player.x = x;
            player.y = y;
            player.z = 0.0;
            player.is_climbing = false;
        }
    }

    fn check_trap(&mut self, world: &mut WorldState, ticks: f64) {
        let player = &mut world.player;
        let on_trap = !player.is_climbing && world.grid.cell_at(player.x, player.y) == CellType::Trap;
        if on_trap {
            player.health = (player.health - self.tuning.trap_damage * ticks).max(0.0);
            player.noise_level = 1.0;
            if !self.on_trap {
                log::debug!("trap at ({:.2}, {:.2})", player.x, player.y);
                self.emit(PlayerEvent::EnteredTrap, "SPIKES // GET OFF");
            }
        }
        self.on_trap = on_trap;
    }

    /// Picks up keys in range and reports whether the exit can be taken this tick.
    fn interact_with_entities(&mut self, world: &mut WorldState) -> bool {
        let player = &mut world.player;
        let mut near_exit = false;
        let mut collected = Vec::new();

        for entity in world.entities.iter_mut().filter(|e| !e.is_removed()) {
            let dist = entity.distance_to(player.x, player.y);
            match entity.kind {
                EntityKind::Key if dist < self.tuning.key_pickup_radius => {
                    entity.remove();
                    player.keys_found += 1;
                    collected.push((entity.id, player.keys_found));
                }
                EntityKind::Exit if dist < self.tuning.exit_radius => near_exit = true,
                _ => {}
            }
        }

        for (id, found) in collected {
            log::info!("key {id} collected ({found}/{})", self.total_keys);
            self.emit(
                PlayerEvent::KeyCollected { id, found, total: self.total_keys },
                format!("KEY OBTAINED {found}/{}", self.total_keys),
            );
        }
        let missing = self.total_keys.saturating_sub(player.keys_found);
        let at_exit = near_exit && missing == 0;
        if near_exit && !self.near_exit && missing > 0 {
            self.emit(
                PlayerEvent::ExitLocked { missing },
                format!("THE EXIT IS SEALED // {missing} MORE KEYS"),
            );
        }
        self.near_exit = near_exit;
        at_exit
    }

    fn resolve_outcome(&mut self, player: &Player, victory: bool) -> Option<Outcome> {
        let defeat = player.is_dead();
        let mut outcome = None;
        if defeat && !self.defeat_latched {
            log::info!("player died at ({:.2}, {:.2})", player.x, player.y);
            self.events.push(PlayerEvent::Defeat);
            outcome = Some(Outcome::Defeat);
        } else if victory && !self.victory_latched {
            log::info!("player escaped with {} keys", player.keys_found);
            self.events.push(PlayerEvent::Victory);
            outcome = Some(Outcome::Victory);
        }
        self.defeat_latched = defeat;
        self.victory_latched = victory;
        outcome
    }

    fn emit(&mut self, event: PlayerEvent, text: impl Into<String>) {
        self.events.push(event);
        self.message = Some(Message { text: text.into(), ticks_left: self.tuning.message_ticks });
    }

    fn tick_message(&mut self) {
        if let Some(message) = &mut self.message {
            message.ticks_left = message.ticks_left.saturating_sub(1);
            if message.ticks_left == 0 {
                self.message = None;
            }
        }
    }
}
