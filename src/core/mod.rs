//! Core game types and logic (data, input, generation, movement).
//!
//! Re-exports:
//! - `grid`: Cell types and the square grid
//! - `entity`: Keys, exit, hostiles
//! - `player`: Player pose and flags
//! - `generator`: Procedural maze generation
//! - `maze`: Hand-authored maze loading and normalization
//! - `world`: The state one session mutates
//! - `input`: Logical actions and pointer motion
//! - `controller`: Movement, collision and interactions

pub mod controller;
pub mod entity;
pub mod generator;
pub mod grid;
pub mod input;
pub mod maze;
pub mod player;
pub mod world;

pub use controller::{Outcome, PlayerController, PlayerEvent};
pub use entity::{Entity, EntityKind};
pub use generator::{Level, MazeGenerator};
pub use grid::{CellType, Grid};
pub use input::{Action, InputSnapshot};
pub use player::{Player, PlayerMode};
pub use world::WorldState;
