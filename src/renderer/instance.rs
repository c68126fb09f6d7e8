//! Instance data for instanced meshes

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Per-instance model matrix plus tint, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl InstanceRaw {
    pub fn new(pos: Vec3, rotation: Quat, scale: f32, tint: [f32; 4]) -> Self {
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(scale), rotation, pos);
        Self {
            model: model.to_cols_array_2d(),
            tint,
        }
    }

    /// Translation column of the model matrix
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }

    /// Instance buffer layout (shader locations 2..=6; 0 and 1 are per-vertex)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const COLUMN: wgpu::BufferAddress = std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: COLUMN,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: COLUMN * 2,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: COLUMN * 3,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: COLUMN * 4,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.85, 0.9, 1.0, 1.0];
    pub const BLASTER: [f32; 4] = [0.31, 0.27, 0.9, 1.0];
    pub const SPREAD: [f32; 4] = [0.98, 0.75, 0.14, 1.0];
    pub const PLASMA: [f32; 4] = [0.13, 0.77, 0.37, 1.0];
    pub const DRONE: [f32; 4] = [0.98, 0.75, 0.14, 1.0];
    pub const POWERUP: [f32; 4] = [0.2, 1.0, 0.9, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// Parse a `#rrggbb` theme color
pub fn hex_color(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(digits.get(i..i + 2)?, 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
}
