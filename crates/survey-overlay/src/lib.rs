//! Per-vertex data overlay for a planetary body.
//!
//! A pluggable [`OverlayProvider`] supplies a scalar per latitude/longitude.
//! [`map_sample`] turns each scalar into an RGBA color, and the
//! [`IncrementalColorizer`] keeps the sphere's color buffer current: a full
//! recolor when the body, provider or settings change, then two latitude rows
//! per tick while a live coverage source is attached. [`MapOverlay`] drives
//! all of it from the host's frame loop.

mod body;
mod buffer;
mod calibration;
mod capabilities;
mod color;
mod colorizer;
mod coverage;
mod error;
mod gradient;
mod mapper;
mod overlay;
mod provider;
mod providers;
mod registry;

#[cfg(test)]
mod test_support;

pub use body::{Body, BodyCatalog, BodyId};
pub use buffer::{ColorBuffer, ColorFrame};
pub use calibration::{DISPLAY_HEADROOM, PeakSurvey, survey_peak};
pub use capabilities::{AbundanceSource, Capabilities};
pub use color::Rgba;
pub use colorizer::{
    BAND_ROWS, ColorizeContext, IncrementalColorizer, RebuildReason, ScanState, TickReport,
};
pub use coverage::{CoverageLink, CoverageSource, ResourceMask};
pub use error::OverlayError;
pub use gradient::{height_to_color, intensity_color};
pub use mapper::{
    BRIGHT_ALPHA, BRIGHT_RED, DisplayCalibration, MIN_LOG_CUTOFF, ScaleSettings, effective_cutoff,
    intensity, map_sample,
};
pub use overlay::{FrameOutput, HoverTooltip, MapOverlay, OverlayFrame, ViewState};
pub use provider::{OverlayProvider, OverlayTooltip};
pub use providers::{FieldOverlayProvider, ResourceOverlayProvider};
pub use registry::{DEFAULT_PROVIDER, ProviderFactory, ProviderRegistry};
pub use survey_config::ScaleMode;
