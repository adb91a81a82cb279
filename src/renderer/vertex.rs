//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Scene vertex: canvas-pixel position (NDC once uploaded) plus RGBA
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Buffer layout matching `shader.wgsl`'s vertex inputs
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Same color at another position
    pub fn at(self, x: f32, y: f32) -> Self {
        Self::new(x, y, self.color)
    }
}

/// Colors for scene elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.02, 0.0, 0.08, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.12, 0.02, 0.22, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const GRID: [f32; 4] = [0.7, 0.2, 1.0, 0.12];
    pub const STREAK: [f32; 4] = [0.5, 0.9, 1.0, 0.05];
    pub const PLAYER_CORE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Clear color behind the background gradient
    pub const BACKGROUND: [f32; 4] = [0.02, 0.0, 0.08, 1.0];
}

/// Same color with its alpha scaled
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}
