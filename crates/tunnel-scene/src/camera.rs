//! Chase camera that rides the tunnel path

use bevy::prelude::*;
use tunnel_core::CameraRig;

use crate::scene::TunnelPath;
use crate::TunnelSet;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// How far along the path the camera is, in [0, 1]
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PathProgress(pub f32);

/// Offsets of the camera from the path point
#[derive(Resource, Debug, Clone, Copy, Default, Deref)]
pub struct CameraRigSettings(pub CameraRig);

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PathProgress>()
            .init_resource::<CameraRigSettings>()
            .add_systems(Update, follow_path.in_set(TunnelSet::Camera));
    }
}

/// Place the camera behind and above the current path point, looking at it
pub fn follow_path(
    path: Option<Res<TunnelPath>>,
    progress: Res<PathProgress>,
    rig: Res<CameraRigSettings>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(path) = path else {
        return;
    };

    let pose = rig.pose(&path.curve, progress.0);
    for mut transform in &mut cameras {
        *transform = Transform::from_translation(pose.eye).looking_at(pose.target, Vec3::Y);
    }
}
