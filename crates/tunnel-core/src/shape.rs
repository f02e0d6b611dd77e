//! 2D cross-section polygon swept along the path

use glam::Vec2;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("a cross-section needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("cross-section has zero area")]
    Degenerate,
}

/// Closed simple polygon; the last vertex connects back to the first
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    vertices: Vec<Vec2>,
}

impl CrossSection {
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        if vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }
        let shape = Self { vertices };
        if shape.signed_area().abs() <= f32::EPSILON {
            return Err(ShapeError::Degenerate);
        }
        Ok(shape)
    }

    /// Axis-aligned rectangle centered on the origin
    pub fn rectangle(width: f32, height: f32) -> Result<Self, ShapeError> {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area, positive for counter-clockwise winding
    pub fn signed_area(&self) -> f32 {
        let n = self.vertices.len();
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice += a.perp_dot(b);
        }
        twice / 2.0
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Copy with counter-clockwise winding
    pub fn counter_clockwise(&self) -> Self {
        let mut vertices = self.vertices.clone();
        if !self.is_counter_clockwise() {
            vertices.reverse();
        }
        Self { vertices }
    }

    /// Ear-clipping triangulation, CCW triangles indexing `vertices()`
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        let n = self.vertices.len();
        let ccw = self.is_counter_clockwise();

        // Work on a CCW ordering of indices into the original vertex list
        let mut remaining: Vec<usize> = if ccw {
            (0..n).collect()
        } else {
            (0..n).rev().collect()
        };
        let mut triangles = Vec::with_capacity(n.saturating_sub(2));

        let mut guard = 0;
        while remaining.len() > 3 && guard < n * n {
            guard += 1;
            let m = remaining.len();
            let mut clipped = false;

            for i in 0..m {
                let ia = remaining[(i + m - 1) % m];
                let ib = remaining[i];
                let ic = remaining[(i + 1) % m];
                let (a, b, c) = (self.vertices[ia], self.vertices[ib], self.vertices[ic]);

                // Reflex or collinear corner
                if (b - a).perp_dot(c - b) <= 0.0 {
                    continue;
                }

                let contains_other = remaining.iter().any(|&j| {
                    j != ia && j != ib && j != ic && point_in_triangle(self.vertices[j], a, b, c)
                });
                if contains_other {
                    continue;
                }

                triangles.push([ia as u32, ib as u32, ic as u32]);
                remaining.remove(i);
                clipped = true;
                break;
            }

            if !clipped {
                // Self-intersecting input; fall back to a fan over what is left
                break;
            }
        }

        for i in 1..remaining.len().saturating_sub(1) {
            triangles.push([
                remaining[0] as u32,
                remaining[i] as u32,
                remaining[i + 1] as u32,
            ]);
        }
        triangles
    }
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}
