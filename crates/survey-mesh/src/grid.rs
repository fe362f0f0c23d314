//! Vertex addressing for the latitude/longitude grid.
//!
//! Vertex 0 is the north pole, then `nb_lat` rings of `nb_long + 1` vertices
//! from north to south, then the south pole. The last vertex of every ring
//! duplicates the first one's position so the seam can carry `u = 1.0`.

use std::ops::Range;

/// Distinct longitudes per ring in the standard grid.
pub const NB_LONG: u32 = 360;

/// Rings strictly between the poles in the standard grid.
pub const NB_LAT: u32 = 180;

/// Index of the north pole vertex.
pub const NORTH_POLE: u32 = 0;

/// Shape of a latitude/longitude sphere grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SphereGrid {
    /// Distinct longitudes per ring.
    pub nb_long: u32,
    /// Rings between the poles.
    pub nb_lat: u32,
}

impl Default for SphereGrid {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl SphereGrid {
    /// One degree spacing: 360 longitudes by 180 rings.
    pub const STANDARD: Self = Self {
        nb_long: NB_LONG,
        nb_lat: NB_LAT,
    };

    /// Create a grid. Needs at least 3 longitudes and 1 ring.
    pub const fn new(nb_long: u32, nb_lat: u32) -> Self {
        assert!(nb_long >= 3 && nb_lat >= 1);
        Self { nb_long, nb_lat }
    }

    /// Vertices per ring, including the seam duplicate.
    pub const fn ring_len(&self) -> u32 {
        self.nb_long + 1
    }

    /// Total vertices, poles included.
    pub const fn vertex_count(&self) -> u32 {
        self.ring_len() * self.nb_lat + 2
    }

    /// Index of the south pole vertex.
    pub const fn south_pole(&self) -> u32 {
        self.vertex_count() - 1
    }

    /// Index of the vertex at ring `row` (0 = northernmost) and column `lon`
    /// (0..=nb_long).
    pub const fn index(&self, row: u32, lon: u32) -> u32 {
        lon + row * self.ring_len() + 1
    }

    /// Contiguous index range covered by ring `row`.
    pub fn row_range(&self, row: u32) -> Range<usize> {
        let start = self.index(row, 0) as usize;
        start..start + self.ring_len() as usize
    }

    /// Triangles in the two cap fans plus the body.
    pub const fn triangle_count(&self) -> u32 {
        2 * self.nb_long + 2 * self.nb_long * (self.nb_lat - 1)
    }

    /// Length of the index buffer.
    pub const fn index_count(&self) -> u32 {
        self.triangle_count() * 3
    }

    /// Polar angle of ring `row`, measured from the north pole in radians.
    pub fn colatitude(&self, row: u32) -> f32 {
        std::f32::consts::PI * (row + 1) as f32 / (self.nb_lat + 1) as f32
    }

    /// Azimuth of column `lon` in radians. The seam column maps back to 0.
    pub fn azimuth(&self, lon: u32) -> f32 {
        let lon = if lon == self.nb_long { 0 } else { lon };
        std::f32::consts::TAU * lon as f32 / self.nb_long as f32
    }

    /// Latitude in degrees at which ring `row` is sampled for color.
    ///
    /// On the standard grid this is `90 - row`.
    pub fn sample_latitude(&self, row: u32) -> f64 {
        90.0 - row as f64 * 180.0 / self.nb_lat as f64
    }

    /// Longitude in degrees at which column `lon` is sampled for color.
    pub fn sample_longitude(&self, lon: u32) -> f64 {
        lon as f64 * 360.0 / self.nb_long as f64
    }
}
