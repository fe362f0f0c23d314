//! Optional host integrations, injected once at startup.

use std::rc::Rc;

use crate::body::BodyId;
use crate::coverage::CoverageLink;

/// External resource-abundance oracle.
pub trait AbundanceSource {
    /// Abundance fraction in `[0, 1]` of `resource` at `(lat, lon)` degrees.
    fn abundance(&self, lat: f64, lon: f64, resource: &str, body: BodyId, biome_lock: bool)
    -> f32;
}

/// Host services the overlay may use. Each one is optional; a missing
/// service disables the features that need it.
#[derive(Clone, Debug, Default)]
pub struct Capabilities {
    /// Scan-coverage oracle.
    pub coverage: CoverageLink,
    /// Resource abundance oracle, required by the resource provider.
    pub abundance: Option<Rc<dyn AbundanceSource>>,
}

impl std::fmt::Debug for dyn AbundanceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AbundanceSource")
    }
}
