//! Shared stubs for unit tests.

use std::cell::Cell;

use crate::body::{Body, BodyId};
use crate::capabilities::AbundanceSource;
use crate::color::Rgba;
use crate::coverage::{CoverageSource, ResourceMask};
use crate::mapper::ScaleSettings;
use crate::provider::{OverlayProvider, OverlayTooltip};
use survey_config::ScaleMode;

pub fn test_body() -> Body {
    Body {
        id: BodyId(4),
        name: "Kerbin".into(),
        radius_km: 600.0,
    }
}

pub fn linear_settings() -> ScaleSettings {
    ScaleSettings {
        cutoff: 0.0,
        low_color: Rgba::new(0, 0, 0, 0),
        high_color: Rgba::new(255, 0, 0, 200),
        mode: ScaleMode::Linear,
        colored: false,
    }
}

/// Provider backed by a closure of `(lat, lon)`, counting every sample.
pub struct FnProvider {
    f: Box<dyn Fn(f64, f64) -> f64>,
    calls: Cell<usize>,
    pub settings: ScaleSettings,
    pub calibrations: usize,
}

impl FnProvider {
    pub fn new(f: impl Fn(f64, f64) -> f64 + 'static) -> Self {
        Self {
            f: Box::new(f),
            calls: Cell::new(0),
            settings: linear_settings(),
            calibrations: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl OverlayProvider for FnProvider {
    fn key(&self) -> &'static str {
        "fn"
    }

    fn gui_name(&self) -> &str {
        "Test Function"
    }

    fn sample(&self, lat: f64, lon: f64, _body: &Body) -> f64 {
        self.calls.set(self.calls.get() + 1);
        (self.f)(lat, lon)
    }

    fn calibrate(&mut self, _body: &Body) {
        self.calibrations += 1;
    }

    fn scale_settings(&self) -> ScaleSettings {
        self.settings
    }

    fn tooltip(&self, lat: f64, lon: f64, body: &Body) -> OverlayTooltip {
        OverlayTooltip {
            title: "fn".into(),
            content: format!("{:.1}", self.sample(lat, lon, body)),
        }
    }
}

/// Coverage backed by a predicate of `(lon, lat)`, counting queries.
pub struct FnCoverage {
    covered: Box<dyn Fn(f64, f64) -> bool>,
    pub active: Cell<bool>,
    pub queries: Cell<usize>,
}

impl FnCoverage {
    pub fn new(covered: impl Fn(f64, f64) -> bool + 'static) -> Self {
        Self {
            covered: Box::new(covered),
            active: Cell::new(true),
            queries: Cell::new(0),
        }
    }
}

impl CoverageSource for FnCoverage {
    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn is_covered(&self, lon: f64, lat: f64, _body: BodyId, _mask: ResourceMask) -> bool {
        self.queries.set(self.queries.get() + 1);
        (self.covered)(lon, lat)
    }

    fn scan_type(&self, name: &str) -> ResourceMask {
        match name {
            "Ore" => ResourceMask(1 << 3),
            "Water" => ResourceMask(1 << 4),
            _ => ResourceMask::NONE,
        }
    }
}

/// Abundance source returning a fixed fraction per resource name.
pub struct FixedAbundance;

impl AbundanceSource for FixedAbundance {
    fn abundance(&self, lat: f64, _lon: f64, resource: &str, _body: BodyId, biome_lock: bool) -> f32 {
        let base = match resource {
            "Ore" => 0.25,
            "Water" => 0.5,
            _ => 0.1,
        };
        let band = if lat > 0.0 { 1.0 } else { 0.5 };
        if biome_lock { base } else { base * band }
    }
}
