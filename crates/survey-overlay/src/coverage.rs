//! Scan coverage gating.
//!
//! A coverage source answers whether a point of a body has been surveyed for
//! a given kind of data. When gating is on, uncovered points render fully
//! transparent and are never sampled.

use std::rc::Rc;

use crate::body::BodyId;

/// Bit mask of scan types, as understood by the coverage source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourceMask(pub u32);

impl ResourceMask {
    /// No scan type. Coverage sources may treat it as "any".
    pub const NONE: Self = Self(0);

    /// Returns true if no bit is set.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// External scan-coverage oracle.
pub trait CoverageSource {
    /// Whether the source is currently usable. Inactive sources disable gating.
    fn is_active(&self) -> bool {
        true
    }

    /// Whether `(lon, lat)` (degrees) on `body` has been scanned for `mask`.
    fn is_covered(&self, lon: f64, lat: f64, body: BodyId, mask: ResourceMask) -> bool;

    /// Mask for a named scan type; [`ResourceMask::NONE`] if unknown.
    fn scan_type(&self, _name: &str) -> ResourceMask {
        ResourceMask::NONE
    }
}

/// Optional handle on a coverage source.
#[derive(Clone, Default)]
pub struct CoverageLink {
    source: Option<Rc<dyn CoverageSource>>,
}

impl CoverageLink {
    /// No coverage source installed.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Wrap a coverage source.
    pub fn new(source: Rc<dyn CoverageSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// A source is installed, active or not.
    pub fn is_available(&self) -> bool {
        self.source.is_some()
    }

    /// The source, if installed and active.
    pub fn active(&self) -> Option<&dyn CoverageSource> {
        self.source.as_deref().filter(|s| s.is_active())
    }

    /// The gate in force: `Some` only when the user enabled gating and an
    /// active source is installed.
    pub fn gate(&self, use_coverage: bool) -> Option<&dyn CoverageSource> {
        if use_coverage { self.active() } else { None }
    }

    /// Mask for a named scan type, [`ResourceMask::NONE`] without a source.
    pub fn scan_type(&self, name: &str) -> ResourceMask {
        self.source
            .as_deref()
            .map_or(ResourceMask::NONE, |s| s.scan_type(name))
    }
}

impl std::fmt::Debug for CoverageLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageLink")
            .field("available", &self.is_available())
            .finish()
    }
}
