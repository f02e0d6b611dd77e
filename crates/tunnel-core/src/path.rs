//! Helix-shaped camera path

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::curve::{CatmullRomCurve, CurveError, CurveKind};

/// Sampled helix running along -X
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelixPath {
    /// Number of intervals between control points
    #[serde(default = "default_segments")]
    pub segments: usize,
    /// Distance travelled along -X
    #[serde(default = "default_length")]
    pub length: f32,
    /// Radius of the circular cross-motion in the Y-Z plane
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Full revolutions over the whole length
    #[serde(default = "default_turns")]
    pub turns: f32,
}

fn default_segments() -> usize {
    900
}

fn default_length() -> f32 {
    1000.0
}

fn default_radius() -> f32 {
    50.0
}

fn default_turns() -> f32 {
    1.0
}

impl Default for HelixPath {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            length: default_length(),
            radius: default_radius(),
            turns: default_turns(),
        }
    }
}

impl HelixPath {
    /// Control points, `segments + 1` of them
    pub fn points(&self) -> Vec<Vec3> {
        let segments = self.segments.max(1);
        (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let angle = t * TAU * self.turns;
                Vec3::new(
                    -self.length * t,
                    angle.sin() * self.radius,
                    angle.cos() * self.radius,
                )
            })
            .collect()
    }

    /// Catmull-Rom curve through the control points
    pub fn curve(&self, kind: CurveKind, divisions: usize) -> Result<CatmullRomCurve, CurveError> {
        CatmullRomCurve::new(self.points(), kind, divisions)
    }
}
