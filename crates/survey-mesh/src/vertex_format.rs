//! Vertex buffer layouts for overlay rendering.
//!
//! The overlay uses two vertex streams: static geometry ([`OverlayVertex`],
//! uploaded when the body changes) and per-vertex RGBA colors (uploaded
//! whenever the colorizer publishes new rows).
//!
//! | Stream | Location | Offset | Format    | Field    |
//! |--------|----------|--------|-----------|----------|
//! | 0      | 0        | 0      | Float32x3 | position |
//! | 0      | 1        | 12     | Float32x3 | normal   |
//! | 0      | 2        | 24     | Float32x2 | uv       |
//! | 1      | 3        | 0      | Unorm8x4  | color    |

use std::mem;

use glam::{Vec2, Vec3};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Interleaved static vertex of the overlay sphere.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    /// Position on the sphere.
    pub position: [f32; 3],
    /// Outward unit normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(OverlayVertex, [u8; 32]);

impl OverlayVertex {
    /// Pack glam vectors into a vertex.
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }
}

/// Attributes of the geometry stream.
pub const OVERLAY_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 24,
        shader_location: 2,
    },
];

/// Layout of the geometry stream.
pub const OVERLAY_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<OverlayVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &OVERLAY_VERTEX_ATTRIBUTES,
};

/// Attribute of the color stream: 4 normalized bytes.
pub const OVERLAY_COLOR_ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
    format: VertexFormat::Unorm8x4,
    offset: 0,
    shader_location: 3,
}];

/// Layout of the color stream, one RGBA byte quad per vertex.
pub const OVERLAY_COLOR_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<[u8; 4]>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &OVERLAY_COLOR_ATTRIBUTES,
};

const _: () = assert!(OVERLAY_VERTEX_ATTRIBUTES[1].offset == 12);
const _: () = assert!(OVERLAY_VERTEX_ATTRIBUTES[2].offset == 24);
const _: () = assert!(
    OVERLAY_VERTEX_ATTRIBUTES[2].offset + 8 <= mem::size_of::<OverlayVertex>() as u64,
    "Last attribute exceeds vertex stride"
);
