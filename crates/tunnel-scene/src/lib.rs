//! Tunnel Scene - Bevy plugins for the helix tunnel
//!
//! This crate turns the geometry and camera math from `tunnel-core` into a
//! running scene: the glass tube, the chase camera driven by scroll, the
//! HDR environment, an optional glTF model and the cursor trail. Both the
//! native binary and the browser build of `tunnel-viewer` use it.

pub mod camera;
pub mod environment;
pub mod models;
pub mod scene;
pub mod scroll;
pub mod trail;

use bevy::prelude::*;
use tunnel_core::SceneConfig;

/// Scene configuration shared by every plugin
#[derive(Resource, Debug, Clone, Deref)]
pub struct SceneSettings(pub SceneConfig);

/// Per-frame ordering: read input, move the camera, then everything that
/// depends on the camera
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunnelSet {
    Input,
    Camera,
    Effects,
}

/// Plugin that sets up the whole tunnel scene
pub struct TunnelScenePlugin {
    pub config: SceneConfig,
}

impl Plugin for TunnelScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneSettings(self.config.clone()))
            .insert_resource(camera::CameraRigSettings(self.config.camera.rig()))
            .configure_sets(
                Update,
                (TunnelSet::Input, TunnelSet::Camera, TunnelSet::Effects).chain(),
            )
            .add_plugins((
                scene::SceneSetupPlugin,
                camera::CameraPlugin,
                scroll::ScrollPlugin,
                environment::EnvironmentPlugin,
                models::ModelsPlugin,
                trail::TrailPlugin,
            ));
    }
}

pub use camera::{MainCamera, PathProgress};
pub use scene::{TunnelPath, TunnelTube};
