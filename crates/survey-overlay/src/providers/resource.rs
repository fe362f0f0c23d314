//! Resource abundance provider.

use std::rc::Rc;

use survey_config::{Config, ResourceConfig, ResourceOverlayConfig, ScaleMode};
use tracing::{debug, warn};

use crate::body::Body;
use crate::capabilities::{AbundanceSource, Capabilities};
use crate::color::Rgba;
use crate::coverage::{CoverageLink, ResourceMask};
use crate::mapper::ScaleSettings;
use crate::provider::{OverlayProvider, OverlayTooltip};

/// Abundance is reported as a fraction; the overlay works in percent.
const PERCENT: f64 = 100.0;

/// Shows the abundance of one resource, in percent.
pub struct ResourceOverlayProvider {
    source: Option<Rc<dyn AbundanceSource>>,
    coverage: CoverageLink,
    settings: ResourceOverlayConfig,
    mask: ResourceMask,
    redraw: bool,
}

impl ResourceOverlayProvider {
    /// Registry key.
    pub const KEY: &'static str = "resource";

    /// Create with the failsafe resource set.
    pub fn new(caps: &Capabilities) -> Self {
        let mut provider = Self {
            source: caps.abundance.clone(),
            coverage: caps.coverage.clone(),
            settings: ResourceOverlayConfig::failsafe(),
            mask: ResourceMask::NONE,
            redraw: false,
        };
        provider.refresh_mask();
        provider
    }

    /// Current settings.
    pub fn settings(&self) -> &ResourceOverlayConfig {
        &self.settings
    }

    /// All configured resources.
    pub fn resources(&self) -> &[ResourceConfig] {
        &self.settings.resources
    }

    /// The resource being displayed.
    pub fn active_resource(&self) -> Option<&ResourceConfig> {
        self.settings.active()
    }

    /// Select the displayed resource. Returns `false` for an unknown name.
    pub fn set_active_resource(&mut self, name: &str) -> bool {
        if self.settings.find(name).is_none() {
            return false;
        }
        if self.settings.active_resource != name {
            self.settings.active_resource = name.to_string();
            self.refresh_mask();
            self.redraw = true;
        }
        true
    }

    /// Set the cutoff of the active resource.
    pub fn set_cutoff(&mut self, cutoff: f64) {
        let name = self.settings.active_resource.clone();
        if let Some(res) = self.settings.find_mut(&name)
            && res.cutoff != cutoff
        {
            res.cutoff = cutoff;
            self.redraw = true;
        }
    }

    /// Set the scaling mode. Logarithmic and exponential exclude each other.
    pub fn set_scale(&mut self, scale: ScaleMode) {
        if self.settings.scale != scale {
            self.settings.scale = scale;
            self.redraw = true;
        }
    }

    /// Toggle logarithmic scaling; turning it off returns to linear.
    pub fn set_logarithmic(&mut self, on: bool) {
        self.toggle_scale(ScaleMode::Logarithmic, on);
    }

    /// Toggle exponential scaling; turning it off returns to linear.
    pub fn set_exponential(&mut self, on: bool) {
        self.toggle_scale(ScaleMode::Exponential, on);
    }

    fn toggle_scale(&mut self, mode: ScaleMode, on: bool) {
        if on {
            self.set_scale(mode);
        } else if self.settings.scale == mode {
            self.set_scale(ScaleMode::Linear);
        }
    }

    /// Use the height gradient instead of the resource color.
    pub fn set_colored_scale(&mut self, colored: bool) {
        if self.settings.colored_scale != colored {
            self.settings.colored_scale = colored;
            self.redraw = true;
        }
    }

    /// Ask the abundance source for biome-locked values.
    pub fn set_biome_lock(&mut self, lock: bool) {
        if self.settings.biome_lock != lock {
            self.settings.biome_lock = lock;
            self.redraw = true;
        }
    }

    fn refresh_mask(&mut self) {
        self.mask = match self.settings.active() {
            Some(res) => self.coverage.scan_type(res.scan_key()),
            None => ResourceMask::NONE,
        };
    }

    fn abundance(&self, lat: f64, lon: f64, body: &Body) -> f64 {
        match (&self.source, self.settings.active()) {
            (Some(source), Some(res)) => {
                source.abundance(lat, lon, &res.name, body.id, self.settings.biome_lock) as f64
                    * PERCENT
            }
            _ => 0.0,
        }
    }
}

impl OverlayProvider for ResourceOverlayProvider {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn gui_name(&self) -> &str {
        "Resource Map"
    }

    fn can_activate(&self) -> bool {
        self.source.is_some()
    }

    fn activate(&mut self, _body: Option<&Body>) {
        self.refresh_mask();
        self.redraw = true;
    }

    fn sample(&self, lat: f64, lon: f64, body: &Body) -> f64 {
        self.abundance(lat, lon, body)
    }

    fn scale_settings(&self) -> ScaleSettings {
        let fallback = ResourceConfig::default();
        let res = self.settings.active().unwrap_or(&fallback);
        ScaleSettings {
            cutoff: res.cutoff,
            low_color: Rgba::from(res.low_color),
            high_color: Rgba::from(res.high_color),
            mode: self.settings.scale,
            colored: self.settings.colored_scale,
        }
    }

    fn coverage_mask(&self) -> ResourceMask {
        self.mask
    }

    fn tooltip(&self, lat: f64, lon: f64, body: &Body) -> OverlayTooltip {
        OverlayTooltip {
            title: self.settings.active_resource.clone(),
            content: format!("Amount: {:.1}%", self.abundance(lat, lon, body)),
        }
    }

    fn load(&mut self, config: &Config) {
        let mut settings = config.resource.clone();
        if settings.repair() {
            warn!("Resource overlay settings were unusable, repaired");
        }
        if settings != self.settings {
            debug!("Resource overlay settings changed, active = {}", settings.active_resource);
            self.settings = settings;
            self.refresh_mask();
            self.redraw = true;
        }
    }

    fn save(&self, config: &mut Config) {
        config.resource = self.settings.clone();
    }

    fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedAbundance, FnCoverage, test_body};

    fn caps() -> Capabilities {
        Capabilities {
            coverage: CoverageLink::new(Rc::new(FnCoverage::new(|_, _| true))),
            abundance: Some(Rc::new(FixedAbundance)),
        }
    }

    #[test]
    fn test_requires_abundance_source() {
        let without = ResourceOverlayProvider::new(&Capabilities::default());
        assert!(!without.can_activate());
        assert_eq!(without.sample(10.0, 10.0, &test_body()), 0.0);
        assert!(ResourceOverlayProvider::new(&caps()).can_activate());
    }

    #[test]
    fn test_starts_with_failsafe_set() {
        let p = ResourceOverlayProvider::new(&caps());
        let names: Vec<&str> = p.resources().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["Karbonite", "Ore", "Water", "Minerals", "Substrate", "Uraninite"]
        );
        assert_eq!(p.active_resource().unwrap().name, "Karbonite");
    }

    #[test]
    fn test_sample_in_percent() {
        let mut p = ResourceOverlayProvider::new(&caps());
        assert!(p.set_active_resource("Ore"));
        assert_eq!(p.sample(10.0, 0.0, &test_body()), 25.0);
        assert_eq!(p.sample(-10.0, 0.0, &test_body()), 12.5);
        p.set_biome_lock(true);
        assert_eq!(p.sample(-10.0, 0.0, &test_body()), 25.0);
    }

    #[test]
    fn test_setters_raise_redraw_only_on_change() {
        let mut p = ResourceOverlayProvider::new(&caps());
        assert!(!p.take_redraw_request());

        assert!(p.set_active_resource("Karbonite"));
        assert!(!p.take_redraw_request());

        assert!(p.set_active_resource("Water"));
        assert!(p.take_redraw_request());

        p.set_colored_scale(true);
        assert!(p.take_redraw_request());
        p.set_colored_scale(true);
        assert!(!p.take_redraw_request());

        p.set_cutoff(5.0);
        assert!(p.take_redraw_request());
        assert_eq!(p.scale_settings().cutoff, 5.0);
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let mut p = ResourceOverlayProvider::new(&caps());
        assert!(!p.set_active_resource("Unobtainium"));
        assert_eq!(p.active_resource().unwrap().name, "Karbonite");
        assert!(!p.take_redraw_request());
    }

    #[test]
    fn test_log_and_exp_exclusive() {
        let mut p = ResourceOverlayProvider::new(&caps());
        p.set_logarithmic(true);
        assert_eq!(p.settings().scale, ScaleMode::Logarithmic);
        p.set_exponential(true);
        assert_eq!(p.settings().scale, ScaleMode::Exponential);
        p.set_logarithmic(false);
        assert_eq!(p.settings().scale, ScaleMode::Exponential);
        p.set_exponential(false);
        assert_eq!(p.settings().scale, ScaleMode::Linear);
    }

    #[test]
    fn test_coverage_mask_follows_active_resource() {
        let mut p = ResourceOverlayProvider::new(&caps());
        assert_eq!(p.coverage_mask(), ResourceMask::NONE);
        p.set_active_resource("Ore");
        assert_eq!(p.coverage_mask(), ResourceMask(1 << 3));
    }

    #[test]
    fn test_scale_settings_from_active_resource() {
        let mut p = ResourceOverlayProvider::new(&caps());
        p.set_active_resource("Water");
        let s = p.scale_settings();
        assert_eq!(s.high_color, Rgba::new(0, 0, 255, 200));
        assert_eq!(s.low_color, Rgba::TRANSPARENT);
        assert_eq!(s.mode, ScaleMode::Linear);
        assert!(!s.colored);
    }

    #[test]
    fn test_tooltip_format() {
        let mut p = ResourceOverlayProvider::new(&caps());
        p.set_active_resource("Water");
        let tip = p.tooltip(20.0, 0.0, &test_body());
        assert_eq!(tip.title, "Water");
        assert_eq!(tip.content, "Amount: 50.0%");
    }

    #[test]
    fn test_load_repairs_empty_resource_list() {
        let mut p = ResourceOverlayProvider::new(&caps());
        p.set_active_resource("Ore");
        p.take_redraw_request();

        let mut config = Config::default();
        config.resource.resources.clear();
        config.resource.active_resource = "Gone".into();
        p.load(&config);

        assert_eq!(p.resources().len(), 6);
        assert_eq!(p.active_resource().unwrap().name, "Karbonite");
        assert!(p.take_redraw_request());
    }

    #[test]
    fn test_load_unchanged_settings_does_not_redraw() {
        let mut p = ResourceOverlayProvider::new(&caps());
        p.load(&Config::default());
        assert!(!p.take_redraw_request());
    }

    #[test]
    fn test_save_round_trips_selection() {
        let mut p = ResourceOverlayProvider::new(&caps());
        p.set_active_resource("Minerals");
        p.set_scale(ScaleMode::Exponential);
        let mut config = Config::default();
        p.save(&mut config);
        assert_eq!(config.resource.active_resource, "Minerals");
        assert_eq!(config.resource.scale, ScaleMode::Exponential);
    }
}
