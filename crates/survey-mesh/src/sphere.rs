//! UV sphere generation at fixed angular resolution.

use glam::{Vec2, Vec3};

use crate::grid::{NORTH_POLE, SphereGrid};
use crate::vertex_format::OverlayVertex;
use crate::winding::first_inward_triangle;

/// Geometry of the overlay sphere. Built once per body and never resized.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    /// Grid the mesh was built from.
    pub grid: SphereGrid,
    /// Vertex positions (unit direction times radius).
    pub positions: Vec<Vec3>,
    /// Normal vectors, `normalize(position)`.
    pub normals: Vec<Vec3>,
    /// UV coordinates, `u` along longitude and `v` from south (0) to north (1).
    pub uvs: Vec<Vec2>,
    /// Triangle indices, counter-clockwise seen from outside.
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as index triplets.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Interleave positions, normals and UVs for a single vertex buffer.
    pub fn interleaved(&self) -> Vec<OverlayVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| OverlayVertex::new(*p, *n, *uv))
            .collect()
    }
}

/// Build the standard 360 x 180 overlay sphere.
pub fn build_standard_sphere(radius: f32) -> SphereMesh {
    build_lat_long_sphere(SphereGrid::STANDARD, radius)
}

/// Build a latitude/longitude sphere on the given grid.
///
/// Ring `row` sits at polar angle `pi * (row + 1) / (nb_lat + 1)`; the poles
/// are single vertices. The cap fans and the two triangles of every quad cell
/// wind counter-clockwise seen from outside.
pub fn build_lat_long_sphere(grid: SphereGrid, radius: f32) -> SphereMesh {
    let vertex_count = grid.vertex_count() as usize;

    let mut positions = vec![Vec3::ZERO; vertex_count];
    positions[NORTH_POLE as usize] = Vec3::Y * radius;
    for row in 0..grid.nb_lat {
        let (sin1, cos1) = grid.colatitude(row).sin_cos();
        for lon in 0..=grid.nb_long {
            let (sin2, cos2) = grid.azimuth(lon).sin_cos();
            positions[grid.index(row, lon) as usize] =
                Vec3::new(sin1 * cos2, cos1, sin1 * sin2) * radius;
        }
    }
    positions[grid.south_pole() as usize] = Vec3::NEG_Y * radius;

    let normals: Vec<Vec3> = positions.iter().map(|p| p.normalize_or_zero()).collect();

    let mut uvs = vec![Vec2::ZERO; vertex_count];
    uvs[NORTH_POLE as usize] = Vec2::Y;
    for row in 0..grid.nb_lat {
        let v = 1.0 - (row + 1) as f32 / (grid.nb_lat + 1) as f32;
        for lon in 0..=grid.nb_long {
            uvs[grid.index(row, lon) as usize] = Vec2::new(lon as f32 / grid.nb_long as f32, v);
        }
    }
    uvs[grid.south_pole() as usize] = Vec2::ZERO;

    let indices = build_indices(grid);
    debug_assert_eq!(indices.len(), grid.index_count() as usize);
    debug_assert_eq!(first_inward_triangle(&positions, &indices), None);

    SphereMesh {
        grid,
        positions,
        normals,
        uvs,
        indices,
    }
}

fn build_indices(grid: SphereGrid) -> Vec<u32> {
    let mut indices = Vec::with_capacity(grid.index_count() as usize);

    // Top cap
    for lon in 0..grid.nb_long {
        indices.extend_from_slice(&[grid.index(0, lon + 1), grid.index(0, lon), NORTH_POLE]);
    }

    // Body
    for row in 0..grid.nb_lat - 1 {
        for lon in 0..grid.nb_long {
            let current = grid.index(row, lon);
            let next = current + grid.ring_len();

            indices.extend_from_slice(&[current, current + 1, next + 1]);
            indices.extend_from_slice(&[current, next + 1, next]);
        }
    }

    // Bottom cap
    let last = grid.nb_lat - 1;
    let south = grid.south_pole();
    for lon in 0..grid.nb_long {
        indices.extend_from_slice(&[
            south,
            grid.index(last, grid.nb_long - lon - 1),
            grid.index(last, grid.nb_long - lon),
        ]);
    }

    indices
}
