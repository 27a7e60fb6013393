//! Desktop host pieces (raylib window input, rodio audio, texture upload).
//! Only compiled with the `window` feature.
//!
//! Re-exports:
//! - `input`: Keyboard and mouse to `InputSnapshot`
//! - `audio`: Footsteps and interaction cues

pub mod audio;
pub mod input;

use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

use crate::render::Framebuffer;

/// Copies the frame into a persistent texture of the same size.
pub fn upload_to_texture(fb: &Framebuffer, tex: &mut Texture2D) {
    let bytes = fb.to_rgba_bytes();
    let _ = tex.update_texture(&bytes);
}
