//! Celestial bodies the overlay can be drawn on.

use rustc_hash::FxHashMap;
use survey_config::Config;
use tracing::warn;

use crate::error::OverlayError;

/// Meters of render scale per kilometer of body radius.
const METERS_PER_KM: f64 = 1000.0;

/// Stable identifier of a body within a [`BodyCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// A body the overlay can target.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Catalog identifier.
    pub id: BodyId,
    /// Display name, unique within the catalog.
    pub name: String,
    /// Mean radius in kilometers.
    pub radius_km: f64,
}

impl Body {
    /// Uniform scale applied to the unit overlay sphere: `1000 * radius_km`.
    ///
    /// A missing or non-positive radius falls back to a 1 km body.
    pub fn render_scale(&self) -> f64 {
        if self.has_valid_radius() {
            self.radius_km * METERS_PER_KM
        } else {
            METERS_PER_KM
        }
    }

    /// Returns true if the radius is finite and positive.
    pub fn has_valid_radius(&self) -> bool {
        self.radius_km.is_finite() && self.radius_km > 0.0
    }
}

/// All bodies known to the host, addressable by id or name.
#[derive(Debug, Default)]
pub struct BodyCatalog {
    bodies: Vec<Body>,
    name_index: FxHashMap<String, usize>,
}

impl BodyCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from the configured bodies. Duplicates are skipped with
    /// a warning.
    pub fn from_config(config: &Config) -> Self {
        let mut catalog = Self::new();
        for body in &config.bodies {
            if let Err(e) = catalog.register(&body.name, body.radius_km) {
                warn!("Skipping body from config: {e}");
            }
        }
        catalog
    }

    /// Add a body and return its id. An unusable radius is kept but logged
    /// here, once; the body renders at unit scale.
    ///
    /// # Errors
    ///
    /// [`OverlayError::DuplicateBody`] if the name is already taken.
    pub fn register(&mut self, name: &str, radius_km: f64) -> Result<BodyId, OverlayError> {
        if self.name_index.contains_key(name) {
            return Err(OverlayError::DuplicateBody(name.to_string()));
        }
        let idx = self.bodies.len();
        let id = BodyId(idx as u32);
        let body = Body {
            id,
            name: name.to_string(),
            radius_km,
        };
        if !body.has_valid_radius() {
            warn!("Body '{name}' has invalid radius {radius_km}, using unit scale");
        }
        self.bodies.push(body);
        self.name_index.insert(name.to_string(), idx);
        Ok(id)
    }

    /// Look up a body by id.
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    /// Look up a body by name.
    pub fn by_name(&self, name: &str) -> Option<&Body> {
        self.name_index.get(name).map(|&idx| &self.bodies[idx])
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over bodies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }
}
