//! Rendering into a CPU framebuffer.
//!
//! Re-exports:
//! - `framebuffer`: RGBA colour and pixel buffer
//! - `textures`: Procedural wall textures and palette
//! - `casters`: DDA ray marching
//! - `render3d`: Column renderer for walls, sky and ground
//! - `sprites`: Billboard sprites (sorting and depth test)

pub mod casters;
pub mod framebuffer;
pub mod render3d;
pub mod sprites;
pub mod textures;

pub use framebuffer::{Color, Framebuffer};
pub use render3d::RaycastRenderer;
