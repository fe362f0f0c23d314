//! Display-max calibration.
//!
//! Before every full recolor the provider is sampled over the whole grid and
//! the display max is set to twice the peak, so the strongest sample lands at
//! half intensity and spikes above it still have room.

use survey_mesh::SphereGrid;

use crate::body::Body;
use crate::provider::OverlayProvider;

/// Factor between the surveyed peak and the display max.
pub const DISPLAY_HEADROOM: f64 = 2.0;

/// Result of a peak survey.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeakSurvey {
    /// Largest finite sample, never below 0.
    pub peak: f64,
    /// Mean of the finite samples.
    pub mean: f64,
    /// Number of samples taken.
    pub samples: usize,
}

impl PeakSurvey {
    /// Sample value mapped to full intensity.
    pub fn display_max(&self) -> f64 {
        self.peak * DISPLAY_HEADROOM
    }
}

/// Sample `provider` on every ring row and distinct longitude of `grid`.
///
/// NaN samples are ignored.
pub fn survey_peak(provider: &dyn OverlayProvider, body: &Body, grid: SphereGrid) -> PeakSurvey {
    let mut peak = 0.0_f64;
    let mut sum = 0.0_f64;
    let mut finite = 0usize;
    let mut samples = 0usize;

    for row in 0..grid.nb_lat {
        let lat = grid.sample_latitude(row);
        for lon in 0..grid.nb_long {
            let value = provider.sample(lat, grid.sample_longitude(lon), body);
            samples += 1;
            if value.is_nan() {
                continue;
            }
            peak = peak.max(value);
            if value.is_finite() {
                sum += value;
                finite += 1;
            }
        }
    }

    let mean = if finite > 0 { sum / finite as f64 } else { 0.0 };
    PeakSurvey {
        peak,
        mean,
        samples,
    }
}
