//! Glowing particles that chase the cursor
//!
//! The cursor is unprojected to a fixed depth in front of the camera every
//! frame, so the trail stays glued to the view while the camera flies
//! down the tunnel.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use tunnel_core::Trail;

use crate::camera::MainCamera;
use crate::{SceneSettings, TunnelSet};

/// The particle positions and the last known cursor
#[derive(Resource, Debug, Clone)]
pub struct CursorTrail {
    pub trail: Trail,
    /// Last cursor position in window coordinates
    pub cursor: Option<Vec2>,
    /// Particles were collapsed onto the first target
    pub seeded: bool,
}

/// One particle; index 0 is the head
#[derive(Component, Debug, Clone, Copy)]
pub struct TrailParticle {
    pub index: usize,
}

pub struct TrailPlugin;

impl Plugin for TrailPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_trail)
            .add_systems(Update, update_trail.in_set(TunnelSet::Effects));
    }
}

fn spawn_trail(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SceneSettings>,
) {
    let config = &settings.trail;
    if !config.enabled || config.count == 0 {
        tracing::info!("Cursor trail disabled");
        return;
    }

    let [r, g, b] = config.color;
    let mesh = meshes.add(Sphere::new(1.0));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(r, g, b),
        unlit: true,
        ..default()
    });

    for index in 0..config.count {
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_scale(Vec3::splat(particle_size(config.size, index, config.count))),
            Visibility::Hidden,
            TrailParticle { index },
        ));
    }

    commands.insert_resource(CursorTrail {
        trail: Trail::new(config.count, config.follow, Vec3::ZERO),
        cursor: None,
        seeded: false,
    });
}

/// Particles shrink toward the tail
fn particle_size(size: f32, index: usize, count: usize) -> f32 {
    size * (1.0 - index as f32 / count as f32)
}

fn update_trail(
    trail: Option<ResMut<CursorTrail>>,
    settings: Res<SceneSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &Transform), With<MainCamera>>,
    mut particles: Query<(&TrailParticle, &mut Transform, &mut Visibility), Without<MainCamera>>,
) {
    let Some(mut trail) = trail else {
        return;
    };

    if let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) {
        trail.cursor = Some(cursor);
    }
    let Some(cursor) = trail.cursor else {
        return;
    };

    // The camera was moved this frame; its GlobalTransform lags a frame
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(&GlobalTransform::from(*camera_transform), cursor) else {
        return;
    };
    let target = ray.get_point(settings.trail.depth);

    if !trail.seeded {
        trail.trail.reset(target);
        trail.seeded = true;
    }
    trail.trail.step(target);

    let positions: Vec<Vec3> = trail.trail.positions().collect();
    for (particle, mut transform, mut visibility) in &mut particles {
        if let Some(position) = positions.get(particle.index) {
            transform.translation = *position;
            *visibility = Visibility::Visible;
        }
    }
}
