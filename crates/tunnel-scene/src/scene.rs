//! Tube geometry, material, lighting and the camera entity

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use tunnel_core::config::MaterialConfig;
use tunnel_core::{extrude, CatmullRomCurve, CrossSection, ExtrudeError, ExtrudedGeometry, SceneConfig};

use crate::camera::{CameraRigSettings, MainCamera};
use crate::SceneSettings;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

/// The helix the tube is extruded along and the camera rides on
#[derive(Resource, Debug, Clone)]
pub struct TunnelPath {
    pub curve: CatmullRomCurve,
}

/// Marker component for the extruded tube
#[derive(Component)]
pub struct TunnelTube;

/// Sweep the configured cross-section along `curve`
pub fn tube_geometry(
    config: &SceneConfig,
    curve: &CatmullRomCurve,
) -> Result<ExtrudedGeometry, ExtrudeError> {
    let shape = CrossSection::rectangle(config.tube.width, config.tube.height)?;
    extrude(&shape, curve, config.tube.extrude_options())
}

/// Upload-ready mesh for extruded geometry
pub fn tube_mesh(geometry: ExtrudedGeometry) -> Mesh {
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, geometry.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, geometry.normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, geometry.uvs)
        .with_inserted_indices(Indices::U32(geometry.indices))
}

/// Physically based glass: fully transmissive, rough enough to blur what is
/// seen through it
pub fn tube_material(config: &MaterialConfig) -> StandardMaterial {
    let [r, g, b] = config.color;
    StandardMaterial {
        base_color: Color::srgb(r, g, b),
        specular_transmission: config.transmission,
        ior: config.ior,
        perceptual_roughness: config.roughness,
        thickness: config.thickness,
        double_sided: config.double_sided,
        cull_mode: if config.double_sided {
            None
        } else {
            Some(Face::Back)
        },
        ..default()
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SceneSettings>,
    rig: Res<CameraRigSettings>,
) {
    let config = &settings.0;

    let curve = config
        .path
        .helix
        .curve(config.path.kind, config.path.arc_length_divisions);

    // Start the camera where the first scroll frame will put it
    let transform = match &curve {
        Ok(curve) => {
            let pose = rig.pose(curve, 0.0);
            Transform::from_translation(pose.eye).looking_at(pose.target, Vec3::Y)
        }
        Err(_) => Transform::default(),
    };
    commands.spawn((
        Camera3d {
            screen_space_specular_transmission_steps: config.camera.transmission_steps,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            ..default()
        }),
        transform,
        MainCamera,
    ));

    let curve = match curve {
        Ok(curve) => curve,
        Err(e) => {
            tracing::error!("Failed to build tunnel path: {}", e);
            return;
        }
    };

    match tube_geometry(config, &curve) {
        Ok(geometry) => {
            tracing::info!(
                "Tube mesh: {} vertices, {} triangles",
                geometry.vertex_count(),
                geometry.triangle_count()
            );
            commands.spawn((
                Mesh3d(meshes.add(tube_mesh(geometry))),
                MeshMaterial3d(materials.add(tube_material(&config.material))),
                Transform::default(),
                TunnelTube,
            ));
        }
        Err(e) => tracing::error!("Failed to extrude tube: {}", e),
    }

    commands.insert_resource(TunnelPath { curve });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunnel_core::HelixPath;

    fn small_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.path.helix = HelixPath {
            segments: 30,
            length: 100.0,
            radius: 10.0,
            turns: 1.0,
        };
        config.tube.steps = 20;
        config
    }

    #[test]
    fn test_tube_mesh_counts() {
        let config = small_config();
        let curve = config.path.helix.curve(config.path.kind, 50).unwrap();
        let geometry = tube_geometry(&config, &curve).unwrap();
        let vertices = geometry.vertex_count();
        let indices = geometry.indices.len();

        let mesh = tube_mesh(geometry);
        assert_eq!(mesh.count_vertices(), vertices);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(indices));
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_UV_0).is_some());
    }

    #[test]
    fn test_material_follows_config() {
        let config = MaterialConfig::default();
        let material = tube_material(&config);
        assert_eq!(material.specular_transmission, 1.0);
        assert_eq!(material.ior, config.ior);
        assert!(material.double_sided);
        assert_eq!(material.cull_mode, None);

        let single = MaterialConfig {
            double_sided: false,
            ..config
        };
        assert_eq!(tube_material(&single).cull_mode, Some(Face::Back));
    }

    fn setup_app(config: SceneConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(CameraRigSettings(config.camera.rig()))
            .insert_resource(SceneSettings(config))
            .add_plugins(SceneSetupPlugin);
        app.update();
        app
    }

    #[test]
    fn test_setup_spawns_camera_tube_and_path() {
        let mut app = setup_app(small_config());

        let world = app.world_mut();
        assert!(world.get_resource::<TunnelPath>().is_some());
        assert_eq!(
            world.query_filtered::<(), With<MainCamera>>().iter(world).count(),
            1
        );
        assert_eq!(
            world.query_filtered::<(), With<TunnelTube>>().iter(world).count(),
            1
        );
    }

    #[test]
    fn test_broken_path_still_gets_a_camera() {
        let mut config = small_config();
        // No arc-length table, no curve
        config.path.arc_length_divisions = 0;
        let mut app = setup_app(config);

        let world = app.world_mut();
        assert!(world.get_resource::<TunnelPath>().is_none());
        assert_eq!(
            world.query_filtered::<(), With<MainCamera>>().iter(world).count(),
            1
        );
        assert_eq!(
            world.query_filtered::<(), With<TunnelTube>>().iter(world).count(),
            0
        );
    }
}
