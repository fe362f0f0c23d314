//! Procedural scalar field, the always-available default provider.
//!
//! Fractal Brownian motion over simplex noise, sampled on the unit sphere so
//! there is no seam at the antimeridian and no pinching at the poles.

use glam::DVec3;
use noise::{NoiseFn, Simplex};
use survey_config::{Config, FieldConfig};
use tracing::debug;

use crate::body::Body;
use crate::capabilities::Capabilities;
use crate::color::Rgba;
use crate::mapper::ScaleSettings;
use crate::provider::{OverlayProvider, OverlayTooltip};

/// Seeded fBm field in `[0, amplitude]`, different for every body.
pub struct FieldOverlayProvider {
    settings: FieldConfig,
    noise: Simplex,
    body_salt: u32,
    redraw: bool,
}

impl FieldOverlayProvider {
    /// Registry key.
    pub const KEY: &'static str = "field";

    /// Create with default settings. Needs no host capability.
    pub fn new(_caps: &Capabilities) -> Self {
        Self::with_settings(FieldConfig::default())
    }

    /// Create with explicit settings.
    pub fn with_settings(settings: FieldConfig) -> Self {
        let noise = Simplex::new(mix_seed(settings.seed, 0));
        Self {
            settings,
            noise,
            body_salt: 0,
            redraw: false,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &FieldConfig {
        &self.settings
    }

    /// Replace the settings. Requests a redraw if anything changed.
    pub fn set_settings(&mut self, settings: FieldConfig) {
        if settings != self.settings {
            self.settings = settings;
            self.reseed();
            self.redraw = true;
        }
    }

    fn reseed(&mut self) {
        self.noise = Simplex::new(mix_seed(self.settings.seed, self.body_salt));
    }

    /// Sum of octave amplitudes for a unit first octave.
    fn octave_weight(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..self.settings.octaves {
            sum += amp;
            amp *= self.settings.persistence;
        }
        sum
    }

    fn fbm(&self, point: DVec3) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.settings.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.settings.octaves {
            let p = point * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;

            frequency *= self.settings.lacunarity;
            amplitude *= self.settings.persistence;
        }

        total
    }
}

fn mix_seed(seed: u64, salt: u32) -> u32 {
    let folded = (seed ^ (seed >> 32)) as u32;
    folded ^ salt.wrapping_mul(0x9e37_79b9)
}

/// Unit direction for a latitude/longitude in degrees, Y up.
fn direction(lat: f64, lon: f64) -> DVec3 {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    DVec3::new(cos_lat * cos_lon, sin_lat, cos_lat * sin_lon)
}

impl OverlayProvider for FieldOverlayProvider {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn gui_name(&self) -> &str {
        "Procedural Field"
    }

    fn activate(&mut self, body: Option<&Body>) {
        if let Some(body) = body {
            self.body_changed(body);
        }
    }

    fn body_changed(&mut self, body: &Body) {
        self.body_salt = body.id.0.wrapping_add(1);
        self.reseed();
        debug!("Field provider reseeded for {}", body.name);
    }

    fn sample(&self, lat: f64, lon: f64, _body: &Body) -> f64 {
        let weight = self.octave_weight();
        if weight <= 0.0 {
            return 0.0;
        }
        let n = (self.fbm(direction(lat, lon)) / weight).clamp(-1.0, 1.0);
        (n + 1.0) * 0.5 * self.settings.amplitude
    }

    fn scale_settings(&self) -> ScaleSettings {
        ScaleSettings {
            cutoff: self.settings.cutoff,
            low_color: Rgba::from(self.settings.low_color),
            high_color: Rgba::from(self.settings.high_color),
            mode: self.settings.scale,
            colored: self.settings.colored_scale,
        }
    }

    fn tooltip(&self, lat: f64, lon: f64, body: &Body) -> OverlayTooltip {
        OverlayTooltip {
            title: self.gui_name().to_string(),
            content: format!("Value: {:.1}", self.sample(lat, lon, body)),
        }
    }

    fn load(&mut self, config: &Config) {
        self.set_settings(config.field.clone());
    }

    fn save(&self, config: &mut Config) {
        config.field = self.settings.clone();
    }

    fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }
}
