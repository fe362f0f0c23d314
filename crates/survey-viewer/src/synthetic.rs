//! Stand-in host services for running the overlay without a game.

use std::cell::Cell;

use survey_overlay::{AbundanceSource, BodyId, CoverageSource, ResourceMask};

/// Coverage that sweeps eastward from longitude 0, as if a polar orbit
/// scanner were mapping the body.
pub struct SweepCoverage {
    frontier: Cell<f64>,
    step: f64,
}

impl SweepCoverage {
    /// Start with nothing covered; each [`advance`](Self::advance) reveals
    /// `step_deg` more degrees of longitude.
    pub fn new(step_deg: f64) -> Self {
        Self {
            frontier: Cell::new(0.0),
            step: step_deg,
        }
    }

    /// Reveal the next strip.
    pub fn advance(&self) {
        self.frontier.set((self.frontier.get() + self.step).min(360.0));
    }

    /// Degrees of longitude covered so far.
    pub fn frontier(&self) -> f64 {
        self.frontier.get()
    }
}

impl CoverageSource for SweepCoverage {
    fn is_covered(&self, lon: f64, _lat: f64, _body: BodyId, _mask: ResourceMask) -> bool {
        lon.rem_euclid(360.0) < self.frontier.get()
    }

    fn scan_type(&self, name: &str) -> ResourceMask {
        let bit = name.bytes().fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32)) % 32;
        ResourceMask(1 << bit)
    }
}

/// Smooth, deterministic abundance bands, different per resource and body.
pub struct BandedAbundance;

impl AbundanceSource for BandedAbundance {
    fn abundance(&self, lat: f64, lon: f64, resource: &str, body: BodyId, biome_lock: bool) -> f32 {
        let (lat, lon) = if biome_lock {
            ((lat / 15.0).floor() * 15.0, (lon / 15.0).floor() * 15.0)
        } else {
            (lat, lon)
        };
        let phase = resource
            .bytes()
            .fold(body.0 as f64, |acc, b| acc * 1.3 + b as f64 * 0.07);
        let wave = (lat.to_radians() * 3.0 + phase).sin() * (lon.to_radians() * 2.0 + phase * 0.5).cos();
        (wave.abs() * 0.2) as f32
    }
}
