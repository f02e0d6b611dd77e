//! Camera placement along the path

use glam::Vec3;

use crate::curve::CatmullRomCurve;

/// Chase-camera offsets relative to the path point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Distance behind the path point, measured along the tangent
    pub trail_distance: f32,
    /// Height added on the world Y axis
    pub lift: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            trail_distance: 5.0,
            lift: 3.0,
        }
    }
}

/// Where the camera sits and what it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraRig {
    /// Pose for `progress` along `curve`; progress is clamped to [0, 1]
    pub fn pose(&self, curve: &CatmullRomCurve, progress: f32) -> CameraPose {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let target = curve.point_at(progress);
        let tangent = curve.tangent_at(progress);
        let eye = target - tangent * self.trail_distance + Vec3::Y * self.lift;
        CameraPose { eye, target }
    }
}
