//! Fixed multi-stop height gradient used by the colored scale.
//!
//! Values at or below `low` ("sea level") blend from dark purple to cerulean
//! over the 1.5 km below it; values above walk the stop list
//! army green, yellow, red, magenta, white.

use glam::Vec3;

use crate::color::Rgba;

const fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    )
}

/// Dark purple, deepest below-band color.
pub const DARK_PURPLE: Vec3 = hex(0x35063e);
/// Cerulean, below-band color at sea level.
pub const CERULEAN: Vec3 = hex(0x0485d1);
/// Army green, first above-band stop.
pub const ARMY_GREEN: Vec3 = hex(0x4b5d16);
/// Yellow.
pub const YELLOW: Vec3 = hex(0xffff14);
/// Red.
pub const RED: Vec3 = hex(0xe50000);
/// Magenta.
pub const MAGENTA: Vec3 = hex(0xc20078);
/// White, top stop.
pub const WHITE: Vec3 = hex(0xffffff);

/// Above-band stops. White is repeated so the top value still has an upper
/// neighbour to interpolate toward.
pub const HEIGHT_GRADIENT: [Vec3; 6] = [ARMY_GREEN, YELLOW, RED, MAGENTA, WHITE, WHITE];

/// Depth below `low` over which the below-band ramp runs.
const BELOW_BAND_DEPTH: f32 = 1500.0;

/// Map `value` to a gradient color given the band floor `low` and range `high`.
pub fn height_to_color(value: f32, low: f32, high: f32) -> Vec3 {
    if value.is_nan() || value <= low {
        let v = if value.is_nan() { low } else { value };
        let t = ((v.clamp(-BELOW_BAND_DEPTH, low) + BELOW_BAND_DEPTH) / 1000.0).clamp(0.0, 1.0);
        return DARK_PURPLE.lerp(CERULEAN, t);
    }

    let top = low + high;
    let segments = (HEIGHT_GRADIENT.len() - 2) as f32;
    let v = if top > 0.0 {
        segments * value.clamp(low, top) / top
    } else {
        segments
    };
    let i = (v.floor() as usize).min(HEIGHT_GRADIENT.len() - 2);
    let frac = (v - i as f32).clamp(0.0, 1.0);
    HEIGHT_GRADIENT[i].lerp(HEIGHT_GRADIENT[i + 1], frac)
}

/// Gradient color for an intensity in `[0, 255]`, with the given alpha.
pub fn intensity_color(t: f64, alpha: u8) -> Rgba {
    Rgba::from_unit_rgb(height_to_color(t as f32, 0.0, 255.0), alpha)
}
