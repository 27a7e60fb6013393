//! Procedural wall textures. No image assets: every texel is a pure function of
//! cell type, texture coordinates, hit side and animation time.

use crate::config::TextureStyle;
use crate::core::grid::CellType;
use crate::render::framebuffer::Color;

pub const TEXTURE_SIZE: u32 = 256;

/// Faces crossed along y are drawn at this brightness.
pub const SIDE_SHADE: f64 = 0.5;

pub const FOG: Color = Color::rgb(25, 28, 32);
pub const CEILING: Color = Color::rgb(15, 23, 42);
pub const GROUND: Color = Color::rgb(30, 41, 59);

const WALL: Color = Color::rgb(71, 85, 105);
const MOSS: Color = Color::rgb(54, 83, 52);
const VINE: Color = Color::rgb(21, 128, 61);
const LOCKER: Color = Color::rgb(60, 60, 60);
const TRAP: Color = Color::rgb(127, 29, 29);

/// Integer lattice hash in [-1, 1].
#[inline]
pub fn hash(n: i32) -> f64 {
    let n = (n << 13) ^ n;
    let m = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589)
        & 0x7fff_ffff;
    1.0 - m as f64 / 1_073_741_824.0
}

/// Whether a screen pixel gets the brief brightness flick this frame.
#[inline]
pub fn sparkles(x: u32, y: u32, animation_time: f64) -> bool {
    let frame = (animation_time * 60.0) as i32;
    hash((x as i32).wrapping_mul(31) ^ (y as i32).wrapping_mul(1_973) ^ frame.wrapping_mul(7_919)) > 0.92
}

pub fn sample_wall(
    cell: CellType,
    tex_x: u32,
    tex_y: u32,
    side: u8,
    style: TextureStyle,
    animation_time: f64,
) -> Color {
    let color = match style {
        TextureStyle::Flat => flat(cell),
        TextureStyle::Detailed => detailed(cell, tex_x % TEXTURE_SIZE, tex_y % TEXTURE_SIZE, animation_time),
    };
    if side == 1 { color.scale(SIDE_SHADE) } else { color }
}

fn flat(cell: CellType) -> Color {
    match cell {
        CellType::Wall => WALL,
        CellType::MossWall => MOSS,
        CellType::VineWall => VINE,
        CellType::Locker => LOCKER,
        CellType::Trap => TRAP,
        CellType::Empty => Color::BLACK,
    }
}

fn detailed(cell: CellType, tx: u32, ty: u32, t: f64) -> Color {
    let (xi, yi) = (tx as i32, ty as i32);
    let nx = tx as f64 / TEXTURE_SIZE as f64;
    let ny = ty as f64 / TEXTURE_SIZE as f64;
    let grain = hash(xi * 13 + yi * 57).abs() * 0.4 + hash(xi * 121 + yi * 193).abs() * 0.6;
    let cracks = ((nx * 40.0 + ny * 10.0).sin() * (ny * 30.0 - nx * 20.0).cos()).max(0.0).powi(12) * 50.0;
    let concrete = concrete(tx, ty, grain, cracks);
    let slime = (nx * 15.0 + ny * 15.0 + t).sin().abs();

    match cell {
        CellType::Wall => concrete,
        CellType::MossWall => {
            // Low-frequency patches over the concrete.
            let patch = hash(xi / 32 * 7 + yi / 32 * 131) + hash(xi / 16 * 17 + yi / 16 * 71) * 0.5;
            if patch > -0.2 {
                let base = concrete.r as f64;
                Color::from_f64(base * 0.5, base * 0.8 + 40.0 + slime * 10.0, base * 0.5 + grain * 10.0)
            } else {
                concrete
            }
        }
        CellType::VineWall => {
            let wobble = (ty as f64 * 0.05).sin() * 4.0;
            let strand = (tx as f64 + wobble).rem_euclid(32.0) < 6.0;
            if strand {
                VINE.scale(0.7 + 0.3 * grain)
            } else {
                let highlight = grain.powi(15) * 120.0;
                let base = concrete.r as f64;
                Color::from_f64(
                    base * 0.3 + highlight * 0.5,
                    base * 0.3 + slime * 10.0 + highlight,
                    base * 0.3 + slime * 15.0 + highlight * 0.8,
                )
            }
        }
        CellType::Locker => {
            let metal = grain * 5.0;
            let frame = tx < 4 || tx > TEXTURE_SIZE - 5 || ty < 4 || ty > TEXTURE_SIZE - 5;
            let vent = (40..100).contains(&ty) && ty % 12 < 4 && (64..192).contains(&tx);
            if frame || vent {
                Color::from_f64(30.0 + metal, 30.0 + metal, 34.0 + metal)
            } else {
                Color::from_f64(60.0 + metal, 62.0 + metal, 68.0 + metal)
            }
        }
        CellType::Trap => TRAP,
        CellType::Empty => Color::BLACK,
    }
}

/// Grainy concrete with cracks and staggered block seams.
fn concrete(tx: u32, ty: u32, grain: f64, cracks: f64) -> Color {
    let row = ty / 64;
    let offset = if row % 2 == 0 { 0 } else { 64 };
    let seam = ty % 64 < 2 || (tx + offset) % 128 < 2;
    let mut base = 40.0 + grain * 20.0 - cracks;
    if seam {
        base *= 0.6;
    }
    Color::from_f64(base, base, base + 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLIDS: [CellType; 4] = [CellType::Wall, CellType::MossWall, CellType::VineWall, CellType::Locker];

    fn average(cell: CellType, side: u8, style: TextureStyle) -> (f64, f64, f64) {
        let mut sum = (0.0, 0.0, 0.0);
        let mut n = 0.0;
        for ty in (0..TEXTURE_SIZE).step_by(8) {
            for tx in (0..TEXTURE_SIZE).step_by(8) {
                let c = sample_wall(cell, tx, ty, side, style, 0.0);
                sum.0 += c.r as f64;
                sum.1 += c.g as f64;
                sum.2 += c.b as f64;
                n += 1.0;
            }
        }
        (sum.0 / n, sum.1 / n, sum.2 / n)
    }

    #[test]
    fn wall_types_are_distinguishable() {
        for style in [TextureStyle::Detailed, TextureStyle::Flat] {
            for (i, &a) in SOLIDS.iter().enumerate() {
                for &b in &SOLIDS[i + 1..] {
                    let (ca, cb) = (average(a, 0, style), average(b, 0, style));
                    let diff = (ca.0 - cb.0).abs() + (ca.1 - cb.1).abs() + (ca.2 - cb.2).abs();
                    assert!(diff > 6.0, "{a:?} and {b:?} look alike in {style:?}: {ca:?} vs {cb:?}");
                }
            }
        }
    }

    #[test]
    fn y_faces_are_darker() {
        for style in [TextureStyle::Detailed, TextureStyle::Flat] {
            for cell in SOLIDS {
                let lit = average(cell, 0, style);
                let shaded = average(cell, 1, style);
                assert!(shaded.0 + shaded.1 + shaded.2 < lit.0 + lit.1 + lit.2, "{cell:?} in {style:?}");
            }
        }
    }

    #[test]
    fn sampling_is_stable() {
        for cell in SOLIDS {
            let a = sample_wall(cell, 17, 203, 0, TextureStyle::Detailed, 1.25);
            let b = sample_wall(cell, 17, 203, 0, TextureStyle::Detailed, 1.25);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn hash_stays_in_range() {
        for n in -2_000..2_000 {
            let h = hash(n * 7_919);
            assert!((-1.0..=1.0).contains(&h), "hash({n}) = {h}");
        }
    }
}
