//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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

/// Colors for game elements
pub mod colors {
    use crate::consts::LEVEL_COLORS;

    /// CSS `green`
    pub const SNAKE: [f32; 4] = [0.0, 128.0 / 255.0, 0.0, 1.0];
    /// CSS `red`
    pub const FOOD: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    /// Pause mask, rgba(255, 255, 255, 0.7)
    pub const MASK: [f32; 4] = [1.0, 1.0, 1.0, 0.7];

    /// Parse `#rrggbb`; anything else comes back opaque white
    pub fn from_hex(hex: &str) -> [f32; 4] {
        let digits = hex.trim_start_matches('#');
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .map(|v| v as f32 / 255.0)
        };
        match (digits.len(), channel(0), channel(2), channel(4)) {
            (6, Some(r), Some(g), Some(b)) => [r, g, b, 1.0],
            _ => [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Level background for a palette index
    pub fn background(index: usize) -> [f32; 4] {
        from_hex(LEVEL_COLORS[index % LEVEL_COLORS.len()])
    }
}
