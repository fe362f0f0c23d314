//! 8-bit RGBA color as stored in the per-vertex color buffer.

use glam::Vec3;

/// One vertex color. Layout matches the `Unorm8x4` color stream.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, used for uncovered points.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert a `[0, 1]` float color, rounding and saturating each channel.
    pub fn from_unit_rgb(rgb: Vec3, a: u8) -> Self {
        Self::new(
            channel(rgb.x as f64 * 255.0),
            channel(rgb.y as f64 * 255.0),
            channel(rgb.z as f64 * 255.0),
            a,
        )
    }

    /// Channels as an array.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        c.to_array()
    }
}

/// Round to the nearest byte value, saturating at 0 and 255. NaN maps to 0.
pub fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
