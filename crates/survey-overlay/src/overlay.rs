//! Per-frame driver tying provider, colorizer and settings together.

use std::path::Path;

use survey_config::{Config, OverlayConfig};
use survey_mesh::{SphereGrid, SphereMesh};
use tracing::{debug, info, warn};

use crate::body::{Body, BodyCatalog, BodyId};
use crate::buffer::ColorFrame;
use crate::capabilities::Capabilities;
use crate::colorizer::{ColorizeContext, IncrementalColorizer, RebuildReason, TickReport};
use crate::error::OverlayError;
use crate::provider::OverlayProvider;
use crate::registry::ProviderRegistry;

/// What the host is showing this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// The map view is open.
    pub map_enabled: bool,
    /// Body the map is centered on.
    pub target: Option<BodyId>,
}

/// Everything needed to draw the overlay this frame.
#[derive(Debug)]
pub struct OverlayFrame<'a> {
    /// Target body.
    pub body: &'a Body,
    /// Uniform scale for the unit sphere.
    pub render_scale: f64,
    /// Sphere geometry.
    pub mesh: &'a SphereMesh,
    /// Changes whenever `mesh` is regenerated.
    pub geometry_generation: u64,
    /// Published vertex colors.
    pub colors: ColorFrame<'a>,
    /// What this frame's tick did.
    pub tick: TickReport,
}

/// Result of [`MapOverlay::update`].
#[derive(Debug)]
pub enum FrameOutput<'a> {
    /// Nothing to draw.
    Hidden,
    /// Draw this.
    Visible(OverlayFrame<'a>),
}

impl FrameOutput<'_> {
    /// Returns true if the overlay should be drawn.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }
}

/// Hover tooltip with coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverTooltip {
    /// Window title.
    pub title: String,
    /// `"Long: .. Lat: .."` line.
    pub coordinates: String,
    /// Provider text.
    pub content: String,
}

/// The overlay as seen by the host.
pub struct MapOverlay {
    config: Config,
    catalog: BodyCatalog,
    registry: ProviderRegistry,
    caps: Capabilities,
    provider: Box<dyn OverlayProvider>,
    colorizer: IncrementalColorizer,
    current_body: Option<BodyId>,
    missing_target: Option<BodyId>,
    gate_live: bool,
    settings_dirty: bool,
}

impl MapOverlay {
    /// Create on the standard 360 x 180 grid.
    pub fn new(
        config: Config,
        catalog: BodyCatalog,
        registry: ProviderRegistry,
        caps: Capabilities,
    ) -> Self {
        Self::with_grid(config, catalog, registry, caps, SphereGrid::STANDARD)
    }

    /// Create on a custom grid.
    pub fn with_grid(
        config: Config,
        catalog: BodyCatalog,
        registry: ProviderRegistry,
        caps: Capabilities,
        grid: SphereGrid,
    ) -> Self {
        let mut provider = registry.resolve(&config.overlay.provider, &caps);
        provider.load(&config);
        provider.activate(None);
        info!(
            "Map overlay ready: {} bodies, provider '{}', coverage {}",
            catalog.len(),
            provider.key(),
            if caps.coverage.is_available() { "available" } else { "absent" }
        );
        Self {
            config,
            catalog,
            registry,
            caps,
            provider,
            colorizer: IncrementalColorizer::new(grid),
            current_body: None,
            missing_target: None,
            gate_live: false,
            settings_dirty: false,
        }
    }

    /// Current settings. Provider settings are only synced by
    /// [`save_config`](Self::save_config).
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Known bodies.
    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    /// Active provider.
    pub fn provider(&self) -> &dyn OverlayProvider {
        &*self.provider
    }

    /// The colorizer, for inspection.
    pub fn colorizer(&self) -> &IncrementalColorizer {
        &self.colorizer
    }

    /// Keys of providers usable with the installed capabilities.
    pub fn available_providers(&self) -> Vec<&'static str> {
        self.registry.activatable(&self.caps)
    }

    /// Draw the overlay at all.
    pub fn set_show(&mut self, show: bool) {
        self.config.overlay.show = show;
    }

    /// Show hover tooltips.
    pub fn set_show_tooltip(&mut self, show: bool) {
        self.config.overlay.show_tooltip = show;
    }

    /// Show hover tooltips outside the map view.
    pub fn set_flight_tooltip(&mut self, show: bool) {
        self.config.overlay.flight_tooltip = show;
    }

    /// High-visibility rendering.
    pub fn set_bright(&mut self, bright: bool) {
        if self.config.overlay.bright != bright {
            self.config.overlay.bright = bright;
            self.settings_dirty = true;
        }
    }

    /// Hide unscanned points.
    pub fn set_use_coverage(&mut self, use_coverage: bool) {
        if self.config.overlay.use_coverage != use_coverage {
            self.config.overlay.use_coverage = use_coverage;
            self.settings_dirty = true;
        }
    }

    /// Switch the active provider.
    ///
    /// # Errors
    ///
    /// [`OverlayError::UnknownProvider`] or [`OverlayError::NotActivatable`];
    /// the current provider stays active in that case.
    pub fn set_provider(&mut self, key: &str) -> Result<(), OverlayError> {
        if key == self.provider.key() {
            return Ok(());
        }
        let mut next = self.registry.build(key, &self.caps)?;

        self.provider.save(&mut self.config);
        self.provider.deactivate();

        next.load(&self.config);
        let body = self.current_body.and_then(|id| self.catalog.get(id));
        next.activate(body);
        next.take_redraw_request();

        info!("Overlay provider: {} -> {}", self.provider.key(), next.key());
        self.provider = next;
        self.config.overlay.provider = key.to_string();
        self.colorizer.invalidate(RebuildReason::ProviderChanged);
        Ok(())
    }

    /// Edit settings in place. Providers pick up their sections and request
    /// a recolor if anything they use changed.
    pub fn edit_config(&mut self, edit: impl FnOnce(&mut Config)) {
        self.provider.save(&mut self.config);
        let mut next = self.config.clone();
        edit(&mut next);
        self.apply_config(next);
    }

    /// Replace settings wholesale, e.g. after re-reading the config file.
    /// A changed body list rebuilds the catalog and retargets the overlay.
    pub fn reload(&mut self, config: Config) {
        self.apply_config(config);
    }

    fn apply_config(&mut self, mut next: Config) {
        if next.resource.repair() {
            warn!("Resource settings were unusable, repaired");
        }
        if next.bodies != self.config.bodies {
            self.catalog = BodyCatalog::from_config(&next);
            self.current_body = None;
            self.missing_target = None;
            info!("Body catalog rebuilt: {} bodies", self.catalog.len());
        }
        let before = self.config.overlay.clone();
        let wanted = next.overlay.provider.clone();
        self.config = next;
        self.provider.load(&self.config);

        if colors_differ(&before, &self.config.overlay) {
            self.settings_dirty = true;
        }
        if wanted != self.provider.key()
            && let Err(e) = self.set_provider(&wanted)
        {
            warn!("Keeping provider '{}': {e}", self.provider.key());
        }
    }

    /// Write provider settings into the config and return it.
    pub fn save_config(&mut self) -> &Config {
        self.provider.save(&mut self.config);
        &self.config
    }

    /// Save settings to `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&mut self, config_dir: &Path) -> Result<(), OverlayError> {
        self.save_config().save(config_dir)?;
        Ok(())
    }

    /// Advance one frame.
    pub fn update(&mut self, view: &ViewState) -> FrameOutput<'_> {
        if !self.config.overlay.show || !view.map_enabled {
            return FrameOutput::Hidden;
        }
        let Some(target) = view.target else {
            return FrameOutput::Hidden;
        };
        let Some(body) = self.catalog.get(target) else {
            if self.missing_target != Some(target) {
                warn!("Overlay target {target:?} is not in the body catalog");
                self.missing_target = Some(target);
            }
            return FrameOutput::Hidden;
        };
        self.missing_target = None;

        if self.current_body != Some(target) {
            debug!("Overlay target: {}", body.name);
            self.provider.body_changed(body);
            self.current_body = Some(target);
            self.colorizer.invalidate(RebuildReason::BodyChanged);
        }

        if self.provider.take_redraw_request() {
            self.colorizer.invalidate(RebuildReason::ConfigChanged);
        }

        let gate = self.caps.coverage.gate(self.config.overlay.use_coverage);
        if gate.is_some() != self.gate_live {
            self.gate_live = gate.is_some();
            self.settings_dirty = true;
        }
        if std::mem::take(&mut self.settings_dirty) {
            self.colorizer.invalidate(RebuildReason::ConfigChanged);
        }

        let tick = self.colorizer.tick(ColorizeContext {
            provider: &mut *self.provider,
            body,
            coverage: gate,
            bright: self.config.overlay.bright,
        });

        let Some(mesh) = self.colorizer.mesh() else {
            return FrameOutput::Hidden;
        };
        FrameOutput::Visible(OverlayFrame {
            body,
            render_scale: body.render_scale(),
            mesh,
            geometry_generation: self.colorizer.geometry_generation(),
            colors: self.colorizer.frame(),
            tick,
        })
    }

    /// Tooltip for the point under the cursor.
    ///
    /// `None` when tooltips are off, outside the map view unless flight
    /// tooltips are on, without a target body, or when the point is not
    /// covered while coverage gating is live.
    pub fn tooltip_at(&self, view: &ViewState, lat: f64, lon: f64) -> Option<HoverTooltip> {
        let overlay = &self.config.overlay;
        if !overlay.show || !overlay.show_tooltip {
            return None;
        }
        if !view.map_enabled && !overlay.flight_tooltip {
            return None;
        }
        let body = self.catalog.get(view.target?)?;
        if let Some(coverage) = self.caps.coverage.gate(overlay.use_coverage)
            && !self.provider.is_covered_at(lat, lon, body, coverage)
        {
            return None;
        }

        let tip = self.provider.tooltip(lat, lon, body);
        Some(HoverTooltip {
            title: tip.title,
            coordinates: format!("Long: {lon:.2} Lat: {lat:.2}"),
            content: tip.content,
        })
    }
}

/// Whether two overlay sections differ in a setting that affects colors.
fn colors_differ(a: &OverlayConfig, b: &OverlayConfig) -> bool {
    a.bright != b.bright || a.use_coverage != b.use_coverage
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use survey_config::{BodyConfig, ScaleMode};

    use super::*;
    use crate::color::Rgba;
    use crate::colorizer::ScanState;
    use crate::coverage::CoverageLink;
    use crate::test_support::{FixedAbundance, FnCoverage};

    const GRID: SphereGrid = SphereGrid::new(12, 6);

    struct Harness {
        overlay: MapOverlay,
        kerbin: BodyId,
        mun: BodyId,
        coverage: Rc<FnCoverage>,
        revealed: Rc<Cell<bool>>,
    }

    fn harness(provider: &str) -> Harness {
        harness_on(provider, GRID)
    }

    fn harness_on(provider: &str, grid: SphereGrid) -> Harness {
        let mut config = Config::failsafe();
        config.overlay.provider = provider.to_string();
        let catalog = BodyCatalog::from_config(&config);
        let kerbin = catalog.by_name("Kerbin").unwrap().id;
        let mun = catalog.by_name("Mun").unwrap().id;

        let revealed = Rc::new(Cell::new(true));
        let flag = revealed.clone();
        let coverage = Rc::new(FnCoverage::new(move |_, _| flag.get()));
        let caps = Capabilities {
            coverage: CoverageLink::new(coverage.clone()),
            abundance: Some(Rc::new(FixedAbundance)),
        };
        let overlay = MapOverlay::with_grid(
            config,
            catalog,
            ProviderRegistry::with_builtin(),
            caps,
            grid,
        );
        Harness {
            overlay,
            kerbin,
            mun,
            coverage,
            revealed,
        }
    }

    fn map_view(target: BodyId) -> ViewState {
        ViewState {
            map_enabled: true,
            target: Some(target),
        }
    }

    fn tick(overlay: &mut MapOverlay, view: ViewState) -> Option<TickReport> {
        match overlay.update(&view) {
            FrameOutput::Visible(frame) => Some(frame.tick),
            FrameOutput::Hidden => None,
        }
    }

    #[test]
    fn test_hidden_without_map_or_show() {
        let mut h = harness("resource");
        let mut view = map_view(h.kerbin);
        view.map_enabled = false;
        assert!(!h.overlay.update(&view).is_visible());

        h.overlay.set_show(false);
        assert!(!h.overlay.update(&map_view(h.kerbin)).is_visible());
        assert!(h.overlay.colorizer().mesh().is_none(), "no work while hidden");

        let no_target = ViewState {
            map_enabled: true,
            target: None,
        };
        h.overlay.set_show(true);
        assert!(!h.overlay.update(&no_target).is_visible());
    }

    #[test]
    fn test_first_visible_frame_rebuilds_and_scales() {
        let mut h = harness("resource");
        match h.overlay.update(&map_view(h.kerbin)) {
            FrameOutput::Visible(frame) => {
                assert_eq!(frame.body.name, "Kerbin");
                assert_eq!(frame.render_scale, 600_000.0);
                assert_eq!(frame.mesh.vertex_count(), GRID.vertex_count() as usize);
                assert!(matches!(
                    frame.tick,
                    TickReport::FullRebuild {
                        geometry_rebuilt: true,
                        ..
                    }
                ));
            }
            FrameOutput::Hidden => panic!("overlay should be visible"),
        }
        assert_eq!(tick(&mut h.overlay, map_view(h.kerbin)), Some(TickReport::Idle));
    }

    #[test]
    fn test_body_switch_rebuilds_geometry() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));
        let report = tick(&mut h.overlay, map_view(h.mun)).unwrap();
        assert!(matches!(
            report,
            TickReport::FullRebuild {
                geometry_rebuilt: true,
                ..
            }
        ));
        assert_eq!(h.overlay.colorizer().geometry_generation(), 2);
    }

    #[test]
    fn test_body_switch_mid_scan_restarts_from_row_zero() {
        let mut h = harness_on("resource", SphereGrid::new(8, 90));
        h.overlay.set_use_coverage(true);
        assert!(matches!(
            tick(&mut h.overlay, map_view(h.kerbin)),
            Some(TickReport::FullRebuild { .. })
        ));
        for _ in 0..20 {
            assert!(matches!(
                tick(&mut h.overlay, map_view(h.kerbin)),
                Some(TickReport::Band { .. })
            ));
        }
        assert_eq!(
            h.overlay.colorizer().state(),
            ScanState::IncrementalScan { band_start: 40 }
        );

        let report = tick(&mut h.overlay, map_view(h.mun)).unwrap();
        assert!(matches!(
            report,
            TickReport::FullRebuild {
                geometry_rebuilt: true,
                ..
            }
        ));
        assert_eq!(
            h.overlay.colorizer().state(),
            ScanState::IncrementalScan { band_start: 0 }
        );
        assert_eq!(
            tick(&mut h.overlay, map_view(h.mun)),
            Some(TickReport::Band { rows: 0..2 })
        );
    }

    #[test]
    fn test_unknown_target_hidden_and_reported_once() {
        let mut h = harness("resource");
        let ghost = map_view(BodyId(999));
        assert!(!h.overlay.update(&ghost).is_visible());
        assert_eq!(h.overlay.missing_target, Some(BodyId(999)));
        assert!(!h.overlay.update(&ghost).is_visible());
        assert_eq!(h.overlay.missing_target, Some(BodyId(999)));
        assert!(h.overlay.colorizer().mesh().is_none());

        assert!(h.overlay.update(&map_view(h.kerbin)).is_visible());
        assert_eq!(h.overlay.missing_target, None);
    }

    #[test]
    fn test_coverage_toggle_starts_and_stops_scan() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));
        assert_eq!(h.overlay.colorizer().state(), ScanState::Idle);

        h.overlay.set_use_coverage(true);
        let report = tick(&mut h.overlay, map_view(h.kerbin)).unwrap();
        assert!(matches!(report, TickReport::FullRebuild { geometry_rebuilt: false, .. }));
        assert_eq!(
            h.overlay.colorizer().state(),
            ScanState::IncrementalScan { band_start: 0 }
        );
        assert_eq!(
            tick(&mut h.overlay, map_view(h.kerbin)),
            Some(TickReport::Band { rows: 0..2 })
        );

        h.overlay.set_use_coverage(false);
        tick(&mut h.overlay, map_view(h.kerbin));
        assert_eq!(h.overlay.colorizer().state(), ScanState::Idle);
    }

    #[test]
    fn test_inactive_source_disables_gating() {
        let mut h = harness("resource");
        h.overlay.set_use_coverage(true);
        h.coverage.active.set(false);
        h.revealed.set(false);
        tick(&mut h.overlay, map_view(h.kerbin));
        assert_eq!(h.overlay.colorizer().state(), ScanState::Idle);
        let lit = h
            .overlay
            .colorizer()
            .frame()
            .colors
            .iter()
            .any(|c| *c != Rgba::TRANSPARENT);
        assert!(lit, "ungated overlay shows data");

        // Source coming back online restarts with gating.
        h.coverage.active.set(true);
        tick(&mut h.overlay, map_view(h.kerbin));
        assert_eq!(
            h.overlay.colorizer().state(),
            ScanState::IncrementalScan { band_start: 0 }
        );
        assert!(
            h.overlay
                .colorizer()
                .frame()
                .colors
                .iter()
                .all(|c| *c == Rgba::TRANSPARENT)
        );
    }

    #[test]
    fn test_setter_without_change_does_not_rebuild() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));
        h.overlay.set_bright(false);
        assert_eq!(tick(&mut h.overlay, map_view(h.kerbin)), Some(TickReport::Idle));
        h.overlay.set_bright(true);
        assert!(matches!(
            tick(&mut h.overlay, map_view(h.kerbin)),
            Some(TickReport::FullRebuild { .. })
        ));
    }

    #[test]
    fn test_provider_redraw_request_triggers_rebuild() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));
        h.overlay.edit_config(|c| c.resource.active_resource = "Water".into());
        assert!(matches!(
            tick(&mut h.overlay, map_view(h.kerbin)),
            Some(TickReport::FullRebuild { geometry_rebuilt: false, .. })
        ));
        assert_eq!(h.overlay.save_config().resource.active_resource, "Water");

        h.overlay.edit_config(|c| c.overlay.show_tooltip = false);
        assert_eq!(tick(&mut h.overlay, map_view(h.kerbin)), Some(TickReport::Idle));
    }

    #[test]
    fn test_set_provider() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));

        h.overlay.set_provider("field").unwrap();
        assert_eq!(h.overlay.provider().key(), "field");
        assert_eq!(h.overlay.config().overlay.provider, "field");
        assert!(matches!(
            tick(&mut h.overlay, map_view(h.kerbin)),
            Some(TickReport::FullRebuild { geometry_rebuilt: false, .. })
        ));

        let err = h.overlay.set_provider("nope").unwrap_err();
        assert!(matches!(err, OverlayError::UnknownProvider(_)));
        assert_eq!(h.overlay.provider().key(), "field");
    }

    #[test]
    fn test_missing_abundance_falls_back_to_field() {
        let config = Config::failsafe();
        let catalog = BodyCatalog::from_config(&config);
        let overlay = MapOverlay::with_grid(
            config,
            catalog,
            ProviderRegistry::with_builtin(),
            Capabilities::default(),
            GRID,
        );
        assert_eq!(overlay.provider().key(), "field");
        assert_eq!(overlay.available_providers(), ["field"]);
        // The configured preference is kept for when the source shows up.
        assert_eq!(overlay.config().overlay.provider, "resource");
    }

    #[test]
    fn test_tooltip() {
        let mut h = harness("resource");
        h.overlay.edit_config(|c| c.resource.active_resource = "Ore".into());
        let tip = h.overlay.tooltip_at(&map_view(h.kerbin), 12.5, 100.25).unwrap();
        assert_eq!(tip.title, "Ore");
        assert_eq!(tip.content, "Amount: 25.0%");
        assert_eq!(tip.coordinates, "Long: 100.25 Lat: 12.50");
    }

    #[test]
    fn test_tooltip_suppressed() {
        let mut h = harness("resource");
        let view = map_view(h.kerbin);

        let flight = ViewState {
            map_enabled: false,
            ..view
        };
        assert!(h.overlay.tooltip_at(&flight, 0.0, 0.0).is_none());
        h.overlay.set_flight_tooltip(true);
        assert!(h.overlay.tooltip_at(&flight, 0.0, 0.0).is_some());

        h.overlay.set_use_coverage(true);
        h.revealed.set(false);
        assert!(h.overlay.tooltip_at(&view, 0.0, 0.0).is_none());
        h.revealed.set(true);
        assert!(h.overlay.tooltip_at(&view, 0.0, 0.0).is_some());

        h.overlay.set_show_tooltip(false);
        assert!(h.overlay.tooltip_at(&view, 0.0, 0.0).is_none());

        let no_target = ViewState {
            target: None,
            ..view
        };
        h.overlay.set_show_tooltip(true);
        assert!(h.overlay.tooltip_at(&no_target, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_reload_switches_provider_and_scale() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));

        let mut next = h.overlay.config().clone();
        next.overlay.provider = "field".into();
        next.resource.scale = ScaleMode::Logarithmic;
        h.overlay.reload(next);

        assert_eq!(h.overlay.provider().key(), "field");
        // The resource provider's settings were saved before it was replaced.
        assert_eq!(h.overlay.save_config().resource.scale, ScaleMode::Logarithmic);
    }

    #[test]
    fn test_reload_rebuilds_body_catalog() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));
        assert!(h.overlay.catalog().by_name("Sarnus").is_none());

        let mut next = h.overlay.config().clone();
        next.bodies.push(BodyConfig::new("Sarnus", 5_300.0));
        h.overlay.reload(next);
        let sarnus = h.overlay.catalog().by_name("Sarnus").unwrap().id;

        // Ids may shift with a new list, so the current target is rebuilt.
        assert!(matches!(
            tick(&mut h.overlay, map_view(h.kerbin)),
            Some(TickReport::FullRebuild {
                geometry_rebuilt: true,
                ..
            })
        ));
        match h.overlay.update(&map_view(sarnus)) {
            FrameOutput::Visible(frame) => assert_eq!(frame.render_scale, 5_300_000.0),
            FrameOutput::Hidden => panic!("new body should be drawable"),
        }
    }

    #[test]
    fn test_reload_with_same_bodies_keeps_catalog() {
        let mut h = harness("resource");
        tick(&mut h.overlay, map_view(h.kerbin));
        let next = h.overlay.save_config().clone();
        h.overlay.reload(next);
        assert_eq!(tick(&mut h.overlay, map_view(h.kerbin)), Some(TickReport::Idle));
    }

    #[test]
    fn test_save_to_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = harness("resource");
        h.overlay.edit_config(|c| c.resource.biome_lock = true);
        h.overlay.save_to(dir.path()).unwrap();

        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert!(loaded.resource.biome_lock);
    }
}
