//! The pluggable data-source contract.

use survey_config::Config;

use crate::body::Body;
use crate::coverage::{CoverageSource, ResourceMask};
use crate::mapper::ScaleSettings;

/// Hover text for a point on the overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayTooltip {
    /// Bold first line.
    pub title: String,
    /// Body text.
    pub content: String,
}

/// A source of one scalar per latitude/longitude on a body.
///
/// Lifecycle: the overlay calls [`activate`](Self::activate) when the
/// provider becomes current, [`body_changed`](Self::body_changed) when the
/// target body switches and [`deactivate`](Self::deactivate) when another
/// provider replaces it. [`sample`](Self::sample) must be deterministic for a
/// given body and settings.
pub trait OverlayProvider {
    /// Registry key.
    fn key(&self) -> &'static str;

    /// Human-readable name.
    fn gui_name(&self) -> &str;

    /// Whether the provider's data source is available.
    fn can_activate(&self) -> bool {
        true
    }

    /// Becoming the current provider for `body`.
    fn activate(&mut self, _body: Option<&Body>) {}

    /// Replaced by another provider.
    fn deactivate(&mut self) {}

    /// Target body switched.
    fn body_changed(&mut self, _body: &Body) {}

    /// Scalar at `(lat, lon)` in degrees. Larger is "more".
    fn sample(&self, lat: f64, lon: f64, body: &Body) -> f64;

    /// Hook run before every full recolor, ahead of the peak survey.
    fn calibrate(&mut self, _body: &Body) {}

    /// Cutoff, colors, mode and colored flag. The display max is surveyed.
    fn scale_settings(&self) -> ScaleSettings;

    /// Scan type the coverage source is queried with.
    fn coverage_mask(&self) -> ResourceMask {
        ResourceMask::NONE
    }

    /// Whether `(lat, lon)` is covered for this provider's data.
    fn is_covered_at(
        &self,
        lat: f64,
        lon: f64,
        body: &Body,
        coverage: &dyn CoverageSource,
    ) -> bool {
        coverage.is_covered(lon, lat, body.id, self.coverage_mask())
    }

    /// Hover text at `(lat, lon)`.
    fn tooltip(&self, lat: f64, lon: f64, body: &Body) -> OverlayTooltip;

    /// Read settings from `config`.
    fn load(&mut self, _config: &Config) {}

    /// Write settings into `config`.
    fn save(&self, _config: &mut Config) {}

    /// Returns and clears the "settings changed, recolor everything" flag.
    fn take_redraw_request(&mut self) -> bool {
        false
    }
}
