//! Scalar sample to RGBA mapping.
//!
//! Pure and deterministic: the color depends only on the sample and the
//! [`DisplayCalibration`] in force.

use survey_config::ScaleMode;

use crate::color::{Rgba, channel};
use crate::gradient::intensity_color;

/// Logarithmic mode never uses a cutoff below this value.
pub const MIN_LOG_CUTOFF: f64 = 1.0;

/// Red channel of the high-visibility color.
pub const BRIGHT_RED: u8 = 155;

/// Alpha of the high-visibility color.
pub const BRIGHT_ALPHA: u8 = 150;

/// Smallest magnitude a scale denominator may take.
const MIN_DENOMINATOR: f64 = 1e-9;

/// Provider-side part of the calibration: everything except the display max.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSettings {
    /// Samples at or below this value render with `low_color`.
    pub cutoff: f64,
    /// Color below the cutoff.
    pub low_color: Rgba,
    /// Color at full intensity; its alpha is kept in every mode but bright.
    pub high_color: Rgba,
    /// Intensity scaling mode.
    pub mode: ScaleMode,
    /// Use the height gradient.
    pub colored: bool,
}

/// Everything needed to turn a sample into a color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayCalibration {
    /// Sample value mapped to full intensity.
    pub max: f64,
    /// Samples at or below this value render with `low_color`.
    pub cutoff: f64,
    /// Color below the cutoff.
    pub low_color: Rgba,
    /// Color at full intensity.
    pub high_color: Rgba,
    /// Intensity scaling mode.
    pub mode: ScaleMode,
    /// Use the height gradient.
    pub colored: bool,
    /// High-visibility magenta mode.
    pub bright: bool,
}

impl DisplayCalibration {
    /// Combine provider settings with a surveyed display max and the bright flag.
    pub fn new(settings: ScaleSettings, max: f64, bright: bool) -> Self {
        Self {
            max,
            cutoff: settings.cutoff,
            low_color: settings.low_color,
            high_color: settings.high_color,
            mode: settings.mode,
            colored: settings.colored,
            bright,
        }
    }
}

/// Cutoff actually compared against: logarithmic mode floors it to
/// [`MIN_LOG_CUTOFF`] so every sample that passes has a defined logarithm.
pub fn effective_cutoff(cutoff: f64, mode: ScaleMode) -> f64 {
    match mode {
        ScaleMode::Logarithmic if !(cutoff >= MIN_LOG_CUTOFF) => MIN_LOG_CUTOFF,
        _ => cutoff,
    }
}

/// Unclamped intensity of `amount` between `cutoff` and `display_max`.
///
/// 255 at `amount == display_max`. Expects the cutoff already passed through
/// [`effective_cutoff`]. A zero-width range is widened to a tiny denominator
/// rather than dividing by zero.
pub fn intensity(amount: f64, cutoff: f64, display_max: f64, mode: ScaleMode) -> f64 {
    let (num, den) = match mode {
        ScaleMode::Linear => (amount - cutoff, display_max - cutoff),
        ScaleMode::Exponential => (
            amount * amount - cutoff * cutoff,
            display_max * display_max - cutoff * cutoff,
        ),
        ScaleMode::Logarithmic => (
            amount.log2() - cutoff.log2(),
            display_max.log2() - cutoff.log2(),
        ),
    };
    num * 255.0 / guard_denominator(den)
}

fn guard_denominator(den: f64) -> f64 {
    if den.abs() >= MIN_DENOMINATOR || den.is_nan() {
        den
    } else if den < 0.0 {
        -MIN_DENOMINATOR
    } else {
        MIN_DENOMINATOR
    }
}

/// Map one sample to a color.
///
/// * at or below the (effective) cutoff, or NaN: `low_color` unchanged
/// * colored: gradient color with `high_color`'s alpha
/// * bright: `(155, t, t, 150)`
/// * otherwise: `high_color` RGB scaled by `t / 255`, `high_color` alpha
pub fn map_sample(amount: f64, cal: &DisplayCalibration) -> Rgba {
    let cutoff = effective_cutoff(cal.cutoff, cal.mode);
    if amount.is_nan() || amount <= cutoff {
        return cal.low_color;
    }

    let t = intensity(amount, cutoff, cal.max, cal.mode);
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 255.0) };

    if cal.colored {
        return intensity_color(t, cal.high_color.a);
    }
    if cal.bright {
        let v = channel(t);
        return Rgba::new(BRIGHT_RED, v, v, BRIGHT_ALPHA);
    }

    let high = cal.high_color;
    Rgba::new(
        channel(t * high.r as f64 / 255.0),
        channel(t * high.g as f64 / 255.0),
        channel(t * high.b as f64 / 255.0),
        high.a,
    )
}
