//! HDR sky and image-based lighting
//!
//! The configured panorama is equirectangular; it is resampled into a cube
//! texture once it finishes loading, then attached to the main camera as
//! both the visible skybox and the environment light that the glass tube
//! refracts and reflects.

use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::core_pipeline::Skybox;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use thiserror::Error;
use tunnel_core::{equirect_to_cube, EnvMapError};

use crate::camera::MainCamera;
use crate::SceneSettings;

#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("panorama pixels are not available on the CPU")]
    NoPixelData,
    #[error("unsupported panorama format {0:?}")]
    UnsupportedFormat(TextureFormat),
    #[error("cubemap conversion failed: {0}")]
    Convert(#[from] EnvMapError),
}

/// Loading progress of the environment map
#[derive(Resource, Debug, Default)]
pub struct EnvironmentState {
    /// The equirectangular source image
    pub source: Option<Handle<Image>>,
    /// The converted cube texture, once ready
    pub cubemap: Option<Handle<Image>>,
    /// Loading or conversion failed; the scene renders without it
    pub failed: bool,
}

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnvironmentState>()
            .add_systems(Startup, load_environment)
            .add_systems(Update, install_environment);
    }
}

fn load_environment(
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
    mut state: ResMut<EnvironmentState>,
) {
    match &settings.environment.hdr {
        Some(path) => {
            tracing::info!("Loading environment map: {}", path);
            state.source = Some(asset_server.load(path.clone()));
        }
        None => tracing::info!("No environment map configured"),
    }
}

fn install_environment(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut state: ResMut<EnvironmentState>,
    settings: Res<SceneSettings>,
    cameras: Query<Entity, With<MainCamera>>,
) {
    if state.cubemap.is_some() || state.failed {
        return;
    }
    let Some(source) = state.source.clone() else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(source.id()) {
        tracing::warn!("Environment map failed to load: {}", err);
        state.failed = true;
        return;
    }

    let converted = match images.get(&source) {
        Some(panorama) => cubemap_from_panorama(panorama, settings.environment.face_size),
        None => return,
    };

    let cube = match converted {
        Ok(cube) => cube,
        Err(e) => {
            tracing::warn!("Environment map unusable: {}", e);
            state.failed = true;
            return;
        }
    };

    let handle = images.add(cube);
    // The panorama is no longer needed once resampled
    images.remove(&source);

    for camera in &cameras {
        commands.entity(camera).insert((
            Skybox {
                image: handle.clone(),
                brightness: settings.environment.brightness,
                ..default()
            },
            EnvironmentMapLight {
                diffuse_map: handle.clone(),
                specular_map: handle.clone(),
                intensity: settings.environment.intensity,
                ..default()
            },
        ));
    }

    tracing::info!("Environment map installed");
    state.cubemap = Some(handle);
}

/// Resample an equirectangular HDR image into a six-layer cube texture
pub fn cubemap_from_panorama(panorama: &Image, face_size: u32) -> Result<Image, EnvironmentError> {
    let data = panorama.data.as_ref().ok_or(EnvironmentError::NoPixelData)?;

    let texels: Vec<f32> = match panorama.texture_descriptor.format {
        TextureFormat::Rgba32Float => bytemuck::pod_collect_to_vec(data),
        TextureFormat::Rgba16Float => bytemuck::pod_collect_to_vec::<u8, half::f16>(data)
            .into_iter()
            .map(half::f16::to_f32)
            .collect(),
        other => return Err(EnvironmentError::UnsupportedFormat(other)),
    };

    let faces = equirect_to_cube(panorama.width(), panorama.height(), &texels, face_size)?;

    // Half floats stay filterable on every backend, including WebGL2
    let packed: Vec<half::f16> = faces.data.iter().copied().map(half::f16::from_f32).collect();

    let mut cube = Image::new(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        bytemuck::cast_slice(&packed).to_vec(),
        TextureFormat::Rgba16Float,
        RenderAssetUsages::RENDER_WORLD,
    );
    cube.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });

    Ok(cube)
}
