//! Incremental per-vertex colorization.
//!
//! State machine driven once per frame:
//!
//! ```text
//!            invalidate(..)
//!   any ─────────────────────▶ FullRebuildPending
//!                                   │ tick: survey peak, recolor every vertex
//!                                   ▼
//!               gate live? ── yes ─▶ IncrementalScan { band_start }
//!                   │                   │ tick: recolor poles + BAND_ROWS rows,
//!                   no                  │       wrap at the last row
//!                   ▼                   ▼
//!                 Idle ◀── gate gone ───┘
//! ```
//!
//! The incremental scan exists because coverage grows while the user scans:
//! re-sampling a narrow band each frame lets newly covered points appear
//! without a full recolor.

use std::ops::Range;

use survey_mesh::{NORTH_POLE, SphereGrid, SphereMesh, build_lat_long_sphere};
use tracing::{debug, trace};

use crate::body::Body;
use crate::buffer::{ColorBuffer, ColorFrame};
use crate::calibration::survey_peak;
use crate::color::Rgba;
use crate::coverage::CoverageSource;
use crate::mapper::{DisplayCalibration, map_sample};
use crate::provider::OverlayProvider;

/// Latitude rows recolored per incremental tick.
pub const BAND_ROWS: u32 = 2;

/// Where the colorizer is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Colors are current and nothing needs refreshing.
    Idle,
    /// Next tick recolors every vertex.
    FullRebuildPending {
        /// Also regenerate the sphere geometry.
        rebuild_geometry: bool,
    },
    /// Coverage gating is live; recolor one band per tick.
    IncrementalScan {
        /// First row of the next band.
        band_start: u32,
    },
}

/// Why a full recolor was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildReason {
    /// Target body switched. Geometry is rebuilt as well.
    BodyChanged,
    /// The active provider was replaced.
    ProviderChanged,
    /// A setting affecting colors changed.
    ConfigChanged,
}

/// What a tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickReport {
    /// Nothing.
    Idle,
    /// Every vertex was recolored.
    FullRebuild {
        /// The sphere geometry was regenerated.
        geometry_rebuilt: bool,
        /// Display max in force after the rebuild.
        display_max: f64,
    },
    /// One band was recolored.
    Band {
        /// Rows recolored.
        rows: Range<u32>,
    },
}

/// Inputs of one tick.
pub struct ColorizeContext<'a> {
    /// Active provider.
    pub provider: &'a mut dyn OverlayProvider,
    /// Target body.
    pub body: &'a Body,
    /// Coverage gate: `Some` only when gating is enabled and the source is
    /// active.
    pub coverage: Option<&'a dyn CoverageSource>,
    /// High-visibility rendering.
    pub bright: bool,
}

/// Owns the overlay sphere and its color buffer and keeps them current.
pub struct IncrementalColorizer {
    grid: SphereGrid,
    state: ScanState,
    mesh: Option<SphereMesh>,
    geometry_generation: u64,
    colors: ColorBuffer,
    calibration: Option<DisplayCalibration>,
}

impl IncrementalColorizer {
    /// New colorizer; the first tick builds geometry and colors.
    pub fn new(grid: SphereGrid) -> Self {
        Self {
            grid,
            state: ScanState::FullRebuildPending {
                rebuild_geometry: true,
            },
            mesh: None,
            geometry_generation: 0,
            colors: ColorBuffer::new(grid.vertex_count() as usize),
            calibration: None,
        }
    }

    /// Grid the colorizer works on.
    pub fn grid(&self) -> SphereGrid {
        self.grid
    }

    /// Current state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// The sphere, once built.
    pub fn mesh(&self) -> Option<&SphereMesh> {
        self.mesh.as_ref()
    }

    /// Bumped every time the geometry is regenerated.
    pub fn geometry_generation(&self) -> u64 {
        self.geometry_generation
    }

    /// Calibration of the latest full rebuild.
    pub fn calibration(&self) -> Option<&DisplayCalibration> {
        self.calibration.as_ref()
    }

    /// Published colors.
    pub fn frame(&self) -> ColorFrame<'_> {
        self.colors.frame()
    }

    /// Schedule a full recolor. A pending geometry rebuild is never dropped.
    pub fn invalidate(&mut self, reason: RebuildReason) {
        let pending_geometry = matches!(
            self.state,
            ScanState::FullRebuildPending {
                rebuild_geometry: true
            }
        );
        let rebuild_geometry = pending_geometry || reason == RebuildReason::BodyChanged;
        debug!("Overlay rebuild requested: {reason:?}");
        self.state = ScanState::FullRebuildPending { rebuild_geometry };
    }

    /// Advance one frame.
    pub fn tick(&mut self, ctx: ColorizeContext<'_>) -> TickReport {
        match self.state {
            ScanState::Idle => TickReport::Idle,
            ScanState::FullRebuildPending { rebuild_geometry } => {
                self.full_rebuild(ctx, rebuild_geometry)
            }
            ScanState::IncrementalScan { band_start } => match self.calibration {
                Some(cal) if ctx.coverage.is_some() => self.band(&ctx, &cal, band_start),
                Some(_) => {
                    self.state = ScanState::Idle;
                    TickReport::Idle
                }
                None => self.full_rebuild(ctx, self.mesh.is_none()),
            },
        }
    }

    fn full_rebuild(&mut self, ctx: ColorizeContext<'_>, rebuild_geometry: bool) -> TickReport {
        ctx.provider.calibrate(ctx.body);
        let survey = survey_peak(&*ctx.provider, ctx.body, self.grid);
        let cal = DisplayCalibration::new(
            ctx.provider.scale_settings(),
            survey.display_max(),
            ctx.bright,
        );

        let geometry_rebuilt = rebuild_geometry || self.mesh.is_none();
        if geometry_rebuilt {
            self.mesh = Some(build_lat_long_sphere(self.grid, 1.0));
            self.geometry_generation += 1;
        }

        let grid = self.grid;
        let painter = Painter {
            provider: &*ctx.provider,
            body: ctx.body,
            coverage: ctx.coverage,
            cal: &cal,
        };
        let staged = self.colors.stage_all();
        staged[NORTH_POLE as usize] = painter.north_pole();
        staged[grid.south_pole() as usize] = painter.south_pole();
        for row in 0..grid.nb_lat {
            painter.row(grid, row, &mut staged[grid.row_range(row)]);
        }
        self.colors.publish();

        debug!(
            "Overlay recolored for {}: peak {:.3}, display max {:.3}, geometry {}",
            ctx.body.name,
            survey.peak,
            cal.max,
            if geometry_rebuilt { "rebuilt" } else { "kept" }
        );

        self.calibration = Some(cal);
        self.state = if ctx.coverage.is_some() {
            ScanState::IncrementalScan { band_start: 0 }
        } else {
            ScanState::Idle
        };
        TickReport::FullRebuild {
            geometry_rebuilt,
            display_max: cal.max,
        }
    }

    fn band(
        &mut self,
        ctx: &ColorizeContext<'_>,
        cal: &DisplayCalibration,
        band_start: u32,
    ) -> TickReport {
        let grid = self.grid;
        let start = band_start.min(grid.nb_lat);
        let end = (start + BAND_ROWS).min(grid.nb_lat);
        let painter = Painter {
            provider: &*ctx.provider,
            body: ctx.body,
            coverage: ctx.coverage,
            cal,
        };

        self.colors.set(NORTH_POLE as usize, painter.north_pole());
        self.colors
            .set(grid.south_pole() as usize, painter.south_pole());
        for row in start..end {
            painter.row(grid, row, self.colors.stage_range(grid.row_range(row)));
        }
        self.colors.publish();
        trace!("Overlay band {start}..{end}");

        let next = if end >= grid.nb_lat { 0 } else { end };
        self.state = ScanState::IncrementalScan { band_start: next };
        TickReport::Band { rows: start..end }
    }
}

/// Colors single points for one tick.
struct Painter<'a> {
    provider: &'a dyn OverlayProvider,
    body: &'a Body,
    coverage: Option<&'a dyn CoverageSource>,
    cal: &'a DisplayCalibration,
}

impl Painter<'_> {
    fn point(&self, lat: f64, lon: f64) -> Rgba {
        if let Some(coverage) = self.coverage
            && !self.provider.is_covered_at(lat, lon, self.body, coverage)
        {
            return Rgba::TRANSPARENT;
        }
        map_sample(self.provider.sample(lat, lon, self.body), self.cal)
    }

    fn north_pole(&self) -> Rgba {
        self.point(90.0, 0.0)
    }

    fn south_pole(&self) -> Rgba {
        self.point(-90.0, 0.0)
    }

    /// Colors of ring `row`, seam column included.
    fn row(&self, grid: SphereGrid, row: u32, out: &mut [Rgba]) {
        let lat = grid.sample_latitude(row);
        for (lon, slot) in (0..=grid.nb_long).zip(out.iter_mut()) {
            *slot = self.point(lat, grid.sample_longitude(lon));
        }
    }
}
