//! Vertex type for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position (simulation pixels, later NDC) and color
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

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scene palette
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.06, 0.06, 0.08, 1.0];
    pub const BAR: [f32; 4] = [0.55, 0.5, 0.45, 1.0];
    pub const BAR_HIGHLIGHT: [f32; 4] = [0.75, 0.7, 0.62, 1.0];
    pub const ANCHOR: [f32; 4] = [0.3, 0.28, 0.26, 1.0];
    pub const STRING: [f32; 4] = [0.85, 0.85, 0.8, 0.8];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
    pub const BALL_RIM: [f32; 4] = [0.35, 0.37, 0.42, 1.0];
    pub const BALL_BODY: [f32; 4] = [0.65, 0.68, 0.74, 1.0];
    pub const BALL_SHINE: [f32; 4] = [0.95, 0.96, 1.0, 1.0];
    pub const BALL_HELD: [f32; 4] = [0.95, 0.75, 0.4, 1.0];
}
