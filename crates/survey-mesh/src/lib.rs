//! Latitude/longitude sphere geometry for the survey overlay.
//!
//! Builds the UV-mapped sphere the overlay colors are painted onto, checks
//! triangle winding, and describes the vertex streams handed to the renderer.

mod grid;
mod sphere;
pub mod vertex_format;
pub mod winding;

pub use grid::{NB_LAT, NB_LONG, NORTH_POLE, SphereGrid};
pub use sphere::{SphereMesh, build_lat_long_sphere, build_standard_sphere};
pub use vertex_format::{
    OVERLAY_COLOR_ATTRIBUTES, OVERLAY_COLOR_LAYOUT, OVERLAY_VERTEX_ATTRIBUTES,
    OVERLAY_VERTEX_LAYOUT, OverlayVertex,
};
pub use winding::{first_inward_triangle, triangle_winds_outward};
