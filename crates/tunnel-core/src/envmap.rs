//! Equirectangular panorama to cubemap conversion
//!
//! Face order and orientation follow the usual GPU cube layout:
//! `+X, -X, +Y, -Y, +Z, -Z`, each face stored row-major with row 0 at the
//! top. Texels are RGBA f32.
//!
//! Cube samplers are left-handed: a world direction `d` is looked up at
//! `(d.x, d.y, -d.z)`. Faces are filled with that flip applied, so the sky
//! seen along world `+Z` is the panorama's `+Z`.

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvMapError {
    #[error("panorama has {actual} floats, expected {expected} for its size")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("panorama or face size is zero")]
    Empty,
}

/// Six square RGBA f32 faces, stacked
#[derive(Debug, Clone)]
pub struct CubeFaces {
    pub face_size: u32,
    pub data: Vec<f32>,
}

impl CubeFaces {
    /// RGBA texels of one face
    pub fn face(&self, index: usize) -> &[f32] {
        let len = (self.face_size * self.face_size * 4) as usize;
        &self.data[index * len..(index + 1) * len]
    }
}

/// Direction through texel `(u, v)` of `face`, with `u, v` in [-1, 1]
fn face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    }
    .normalize()
}

/// Bilinear sample of the panorama along `dir`
fn sample(width: u32, height: u32, rgba: &[f32], dir: Vec3) -> [f32; 4] {
    let u = dir.z.atan2(dir.x) / TAU + 0.5;
    let v = dir.y.clamp(-1.0, 1.0).asin() / PI + 0.5;

    // Continuous texel coordinates; v = 1 is the top row
    let x = u * width as f32 - 0.5;
    let y = (1.0 - v) * height as f32 - 0.5;

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let wrap_x = |x: f32| (x as i64).rem_euclid(width as i64) as usize;
    let clamp_y = |y: f32| (y as i64).clamp(0, height as i64 - 1) as usize;

    let (xa, xb) = (wrap_x(x0), wrap_x(x0 + 1.0));
    let (ya, yb) = (clamp_y(y0), clamp_y(y0 + 1.0));

    let texel = |x: usize, y: usize, c: usize| rgba[(y * width as usize + x) * 4 + c];

    let mut out = [0.0; 4];
    for (c, value) in out.iter_mut().enumerate() {
        let top = texel(xa, ya, c) * (1.0 - fx) + texel(xb, ya, c) * fx;
        let bottom = texel(xa, yb, c) * (1.0 - fx) + texel(xb, yb, c) * fx;
        *value = top * (1.0 - fy) + bottom * fy;
    }
    out
}

/// Resample an equirectangular RGBA f32 panorama into six cube faces
pub fn equirect_to_cube(
    width: u32,
    height: u32,
    rgba: &[f32],
    face_size: u32,
) -> Result<CubeFaces, EnvMapError> {
    if width == 0 || height == 0 || face_size == 0 {
        return Err(EnvMapError::Empty);
    }
    let expected = (width * height * 4) as usize;
    if rgba.len() != expected {
        return Err(EnvMapError::SizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }

    let size = face_size as usize;
    let mut data = Vec::with_capacity(6 * size * size * 4);
    for face in 0..6 {
        for row in 0..size {
            let v = 2.0 * (row as f32 + 0.5) / face_size as f32 - 1.0;
            for col in 0..size {
                let u = 2.0 * (col as f32 + 0.5) / face_size as f32 - 1.0;
                let dir = face_direction(face, u, v) * Vec3::new(1.0, 1.0, -1.0);
                data.extend_from_slice(&sample(width, height, rgba, dir));
            }
        }
    }

    tracing::debug!(width, height, face_size, "Converted panorama to cubemap");

    Ok(CubeFaces { face_size, data })
}
