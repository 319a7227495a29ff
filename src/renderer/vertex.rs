//! Vertex types for the scene pipeline

use bytemuck::{Pod, Zeroable};

/// Pre-projected, pre-lit vertex
///
/// Positions arrive in clip space so the GPU still does perspective-correct
/// interpolation; colour already includes lighting.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    /// How strongly the detail texture modulates the colour (0 = not at all)
    pub detail: f32,
    pub _pad: f32,
}

impl Vertex {
    pub const fn new(position: [f32; 4], color: [f32; 4], uv: [f32; 2], detail: f32) -> Self {
        Self {
            position,
            color,
            uv,
            detail,
            _pad: 0.0,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
        2 => Float32x2,
        3 => Float32,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Base colours for scene elements
pub mod colors {
    pub const PLATFORM: [f32; 3] = [1.0, 1.0, 1.0];
    pub const PAD: [f32; 3] = [1.0, 1.0, 1.0];
    pub const PAD_PRESSED: [f32; 3] = [0.0, 0.0, 0.0];
    pub const DISK: [f32; 3] = [1.0, 1.0, 1.0];
    pub const BACKDROP: [f32; 3] = [0.7, 0.7, 0.75];
    pub const BACKGROUND: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
}
