//! Vertex types and sprite-to-triangle expansion

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::scene::SpriteDraw;
use crate::deg_to_rad;
use crate::math::{Matrix3, Vector3};
use crate::sim::{Sprite, SpriteSizes};

/// Textured, tinted 2D vertex in normalized device coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 2], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            uv,
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
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: (2 * std::mem::size_of::<[f32; 2]>()) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Screen pixels (y down) to NDC (y up)
#[inline]
pub fn pixel_to_ndc(p: Vec2, viewport: Vec2) -> [f32; 2] {
    [p.x / viewport.x * 2.0 - 1.0, 1.0 - p.y / viewport.y * 2.0]
}

/// Two triangles for one sprite draw
pub fn quad_vertices(draw: &SpriteDraw, texture_size: Vec2, viewport: Vec2) -> [Vertex; 6] {
    let d = &draw.dest;
    let o = draw.origin;
    let rot = Matrix3::from_rotation_z(deg_to_rad(draw.rotation));
    let anchor = Vector3::new(d.x, d.y, 0.0);

    // Corners relative to the pivot: top-left, top-right, bottom-right, bottom-left
    let corners = [
        Vector3::new(-o.x, -o.y, 0.0),
        Vector3::new(d.width - o.x, -o.y, 0.0),
        Vector3::new(d.width - o.x, d.height - o.y, 0.0),
        Vector3::new(-o.x, d.height - o.y, 0.0),
    ]
    .map(|c| pixel_to_ndc((rot.multiply(c) + anchor).xy(), viewport));

    let s = &draw.src;
    let (u0, v0) = (s.x / texture_size.x, s.y / texture_size.y);
    let (u1, v1) = (s.right() / texture_size.x, s.bottom() / texture_size.y);
    let uvs = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];

    let v = |i: usize| Vertex::new(corners[i], uvs[i], draw.tint);
    [v(0), v(1), v(2), v(2), v(3), v(0)]
}

/// Consecutive draws sharing one texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub sprite: Sprite,
    pub vertices: Range<u32>,
}

/// Expand draws into one vertex list plus per-texture batches, keeping order
pub fn build_batches(
    draws: &[SpriteDraw],
    sizes: &SpriteSizes,
    viewport: Vec2,
) -> (Vec<Vertex>, Vec<Batch>) {
    let mut vertices = Vec::with_capacity(draws.len() * 6);
    let mut batches: Vec<Batch> = Vec::new();

    for draw in draws {
        let start = vertices.len() as u32;
        vertices.extend_from_slice(&quad_vertices(draw, sizes.get(draw.sprite), viewport));
        let end = vertices.len() as u32;

        match batches.last_mut() {
            Some(batch) if batch.sprite == draw.sprite => batch.vertices.end = end,
            _ => batches.push(Batch {
                sprite: draw.sprite,
                vertices: start..end,
            }),
        }
    }

    (vertices, batches)
}
