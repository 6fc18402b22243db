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
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Convert 0xRRGGBB plus alpha to normalized RGBA
pub fn rgb_hex(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    /// #050510
    pub const BACKGROUND: [f32; 4] = [0.0196, 0.0196, 0.0627, 1.0];
    pub const GRID_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.024];
    pub const FOOD: u32 = 0xff00ff;
    pub const FOOD_GLOW_ALPHA: f32 = 0.25;
    pub const FOOD_HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.27];
    pub const SNAKE_EYE: [f32; 4] = [1.0, 1.0, 1.0, 0.4];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex(0xff00ff, 1.0), [1.0, 0.0, 1.0, 1.0]);
        assert_eq!(rgb_hex(0x000000, 2.0), [0.0, 0.0, 0.0, 1.0]);
        let c = rgb_hex(0xff0066, 0.5);
        assert!((c[2] - 0.4).abs() < 1e-6);
        assert_eq!(c[3], 0.5);
    }
}
