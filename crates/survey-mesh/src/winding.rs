//! Winding order checks for the overlay sphere.
//!
//! Triangles are counter-clockwise when viewed from outside the sphere, so the
//! geometric normal agrees with `normalize(position)` and backface culling
//! keeps the outer surface.

use glam::Vec3;

/// Check if a triangle has outward-facing winding order.
///
/// Returns `true` if the triangle's normal (via cross product) has a positive
/// dot product with the centroid direction from the sphere center.
pub fn triangle_winds_outward(v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let face_normal = (v1 - v0).cross(v2 - v0);
    let centroid = (v0 + v1 + v2) / 3.0;
    face_normal.dot(centroid) > 0.0
}

/// Position in `indices / 3` of the first triangle that does not wind outward.
pub fn first_inward_triangle(positions: &[Vec3], indices: &[u32]) -> Option<usize> {
    indices.chunks_exact(3).position(|tri| {
        let v0 = positions[tri[0] as usize];
        let v1 = positions[tri[1] as usize];
        let v2 = positions[tri[2] as usize];
        !triangle_winds_outward(v0, v1, v2)
    })
}
