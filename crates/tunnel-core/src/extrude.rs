//! Sweep a cross-section along a curve into an indexed triangle mesh
//!
//! Sections are placed at `steps + 1` arc-length-spaced samples. At each
//! sample a 2D vertex `(x, y)` lands at `origin + normal * x + binormal * y`
//! using the curve's parallel-transport frames. Every polygon edge gets its
//! own strip of vertices so the wall normals stay sharp at corners.

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::curve::CatmullRomCurve;
use crate::shape::{CrossSection, ShapeError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtrudeError {
    #[error("extrusion needs at least one step")]
    ZeroSteps,
    #[error("invalid cross-section: {0}")]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    /// Number of intervals along the path
    pub steps: usize,
    /// Close both ends with flat caps
    pub caps: bool,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            steps: 300,
            caps: true,
        }
    }
}

/// Renderer-agnostic triangle mesh
#[derive(Debug, Clone, Default)]
pub struct ExtrudedGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl ExtrudedGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv.to_array());
        index
    }
}

/// Extrude `shape` along `curve`
pub fn extrude(
    shape: &CrossSection,
    curve: &CatmullRomCurve,
    options: ExtrudeOptions,
) -> Result<ExtrudedGeometry, ExtrudeError> {
    if options.steps == 0 {
        return Err(ExtrudeError::ZeroSteps);
    }

    let steps = options.steps;
    let shape = shape.counter_clockwise();
    let vertices = shape.vertices();
    let n = vertices.len();

    let origins = curve.spaced_points(steps);
    let frames = curve.frenet_frames(steps);

    let place = |s: usize, v: Vec2| origins[s] + frames.normals[s] * v.x + frames.binormals[s] * v.y;

    let perimeter: f32 = (0..n)
        .map(|i| vertices[i].distance(vertices[(i + 1) % n]))
        .sum();

    let cap_triangles = if options.caps { shape.triangulate() } else { Vec::new() };

    let mut geometry = ExtrudedGeometry::default();
    geometry.positions.reserve(n * 2 * (steps + 1) + 2 * n);
    geometry.indices.reserve(n * steps * 6 + cap_triangles.len() * 6);

    // Side walls
    let mut along = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let edge = b - a;
        let outward = Vec2::new(edge.y, -edge.x).normalize_or_zero();

        let v0 = along / perimeter;
        along += edge.length();
        let v1 = along / perimeter;

        let first = geometry.positions.len() as u32;
        for s in 0..=steps {
            let u = s as f32 / steps as f32;
            let normal = (frames.normals[s] * outward.x + frames.binormals[s] * outward.y)
                .normalize_or_zero();
            geometry.push(place(s, a), normal, Vec2::new(u, v0));
            geometry.push(place(s, b), normal, Vec2::new(u, v1));
        }

        for s in 0..steps as u32 {
            let a0 = first + s * 2;
            let b0 = a0 + 1;
            let a1 = a0 + 2;
            let b1 = a0 + 3;
            geometry.indices.extend_from_slice(&[a0, b0, a1, b0, b1, a1]);
        }
    }

    if options.caps {
        let (min, max) = bounds(vertices);
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));

        for (s, facing, flip) in [(0, -frames.tangents[0], true), (steps, frames.tangents[steps], false)] {
            let first = geometry.positions.len() as u32;
            for v in vertices {
                geometry.push(place(s, *v), facing, (*v - min) / extent);
            }
            for tri in &cap_triangles {
                let [i0, i1, i2] = tri.map(|i| first + i);
                if flip {
                    geometry.indices.extend_from_slice(&[i0, i2, i1]);
                } else {
                    geometry.indices.extend_from_slice(&[i0, i1, i2]);
                }
            }
        }
    }

    tracing::debug!(
        vertices = geometry.vertex_count(),
        triangles = geometry.triangle_count(),
        steps,
        "Extruded cross-section"
    );

    Ok(geometry)
}

fn bounds(vertices: &[Vec2]) -> (Vec2, Vec2) {
    vertices.iter().fold(
        (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        |(min, max), v| (min.min(*v), max.max(*v)),
    )
}
