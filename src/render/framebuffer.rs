/// 8-bit RGBA colour, laid out the way a texture upload expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Builds an opaque colour from float channels, clamping each to 0..=255.
    #[inline]
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        let c = |v: f64| v.clamp(0.0, 255.0) as u8;
        Self::rgb(c(r), c(g), c(b))
    }

    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self::from_f64(self.r as f64 * k, self.g as f64 * k, self.b as f64 * k)
    }

    /// Linear blend towards `other`; `t` is clamped to [0, 1].
    #[inline]
    pub fn lerp(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let f = |a: u8, b: u8| a as f64 * (1.0 - t) + b as f64 * t;
        Self::from_f64(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// Adds `amount` to every channel, saturating.
    #[inline]
    pub fn brighten(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_add(amount),
            self.g.saturating_add(amount),
            self.b.saturating_add(amount),
            self.a,
        )
    }
}

/// Fixed-resolution CPU pixel buffer, row-major.
pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self { color_buffer: vec![Color::BLACK; size], width, height }
    }

    #[inline]
    pub fn clear(&mut self, color: Color) {
        self.color_buffer.fill(color);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    /// Alpha-composites `color` over what is already there.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color, alpha: f64) {
        if x < self.width && y < self.height {
            let i = (y * self.width + x) as usize;
            self.color_buffer[i] = self.color_buffer[i].lerp(color, alpha);
        }
    }

    /// Fills row `y` with one colour.
    pub fn fill_row(&mut self, y: u32, color: Color) {
        if y < self.height {
            let start = (y * self.width) as usize;
            self.color_buffer[start..start + self.width as usize].fill(color);
        }
    }

    /// Packed RGBA8 bytes, ready for a texture upload.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.color_buffer.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(4, 0, Color::WHITE);
        fb.set_pixel(0, 3, Color::WHITE);
        assert!(fb.color_buffer.iter().all(|&c| c == Color::BLACK));
        fb.set_pixel(3, 2, Color::WHITE);
        assert_eq!(fb.color_buffer[2 * 4 + 3], Color::WHITE);
    }

    #[test]
    fn blend_interpolates_channels() {
        let mut fb = Framebuffer::new(1, 1);
        fb.blend_pixel(0, 0, Color::rgb(200, 100, 0), 0.5);
        assert_eq!(fb.color_buffer[0], Color::rgb(100, 50, 0));
    }

    #[test]
    fn rgba_bytes_are_packed() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set_pixel(1, 0, Color::new(1, 2, 3, 4));
        assert_eq!(fb.to_rgba_bytes(), vec![0, 0, 0, 255, 1, 2, 3, 4]);
    }
}
