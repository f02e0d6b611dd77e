//! Optional glTF model placed in the scene

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use tunnel_core::config::ModelConfig;

use crate::SceneSettings;

/// Tracks the configured model from request to spawn
#[derive(Resource, Debug, Default)]
pub struct ModelLoad {
    pub path: Option<String>,
    pub handle: Option<Handle<Gltf>>,
    /// Set once the model was spawned or failed to load
    pub done: bool,
}

/// Marker component for the spawned model root
#[derive(Component)]
pub struct SceneModel;

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLoad>()
            .add_systems(Startup, request_model)
            .add_systems(Update, spawn_loaded_model);
    }
}

fn request_model(
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
    mut model: ResMut<ModelLoad>,
) {
    let Some(path) = settings.model.path.clone() else {
        model.done = true;
        return;
    };
    tracing::info!("Loading model: {}", path);
    model.handle = Some(asset_server.load(path.clone()));
    model.path = Some(path);
}

/// Place a loaded scene at the configured transform
pub fn spawn_model(commands: &mut Commands, scene: Handle<Scene>, config: &ModelConfig) -> Entity {
    let [x, y, z] = config.position;
    commands
        .spawn((
            SceneRoot(scene),
            Transform::from_xyz(x, y, z).with_scale(Vec3::splat(config.scale)),
            SceneModel,
        ))
        .id()
}

fn spawn_loaded_model(
    mut commands: Commands,
    mut model: ResMut<ModelLoad>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    settings: Res<SceneSettings>,
) {
    if model.done {
        return;
    }
    let Some(handle) = model.handle.clone() else {
        return;
    };
    let path = model.path.clone().unwrap_or_default();

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let scene = gltf_assets
                .get(&handle)
                .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));

            match scene {
                Some(scene) => {
                    spawn_model(&mut commands, scene, &settings.model);
                    tracing::info!("Model loaded: {}", path);
                }
                None => tracing::warn!("Model has no scenes: {}", path),
            }
            model.done = true;
        }
        Some(LoadState::Failed(err)) => {
            tracing::error!("Failed to load model {}: {}", path, err);
            model.done = true;
        }
        _ => {
            // Still loading
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tunnel_core::SceneConfig;

    fn models_app(path: Option<&str>) -> App {
        let mut config = SceneConfig::default();
        config.model.path = path.map(str::to_string);

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .insert_resource(SceneSettings(config))
            .add_plugins(ModelsPlugin);
        app
    }

    #[test]
    fn test_no_model_configured() {
        let mut app = models_app(None);
        app.update();

        let model = app.world().resource::<ModelLoad>();
        assert!(model.done);
        assert!(model.handle.is_none());

        let world = app.world_mut();
        assert_eq!(world.query::<&SceneModel>().iter(world).count(), 0);
    }

    #[test]
    fn test_missing_model_is_reported_once() {
        let mut app = models_app(Some("models/missing.glb"));
        for _ in 0..500 {
            app.update();
            if app.world().resource::<ModelLoad>().done {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        let model = app.world().resource::<ModelLoad>();
        assert!(model.done);
        assert_eq!(model.path.as_deref(), Some("models/missing.glb"));

        let world = app.world_mut();
        assert_eq!(world.query::<&SceneModel>().iter(world).count(), 0);
    }

    #[test]
    fn test_spawn_model_uses_configured_transform() {
        let config = ModelConfig {
            path: Some("models/ship.glb".to_string()),
            position: [1.0, -2.0, 3.0],
            scale: 0.5,
        };

        let mut world = World::new();
        let entity = spawn_model(&mut world.commands(), Handle::default(), &config);
        world.flush();

        let transform = world.get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(transform.scale, Vec3::splat(0.5));
        assert!(world.get::<SceneRoot>(entity).is_some());
        assert!(world.get::<SceneModel>(entity).is_some());
    }
}
