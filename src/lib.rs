//! First-person maze runner: procedural mazes, a DDA raycaster that draws into
//! a CPU framebuffer, and the player rules (crouch, climb, hide, noise) both
//! depend on.
//!
//! One frame is `PlayerController::update` followed by `RaycastRenderer::render`;
//! the host owns the window, input devices and HUD.

pub mod config;
pub mod core;
pub mod error;
pub mod render;

#[cfg(feature = "window")]
pub mod host;

pub use config::GameConfig;
pub use error::{ConfigError, MapError};
