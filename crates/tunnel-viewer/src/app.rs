//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use tunnel_core::SceneConfig;
use tunnel_scene::TunnelScenePlugin;

/// Primary window for the configured canvas and size
pub fn primary_window(config: &SceneConfig) -> Window {
    Window {
        title: config.window.title.clone(),
        resolution: WindowResolution::new(config.window.width, config.window.height),
        canvas: Some(config.window.canvas.clone()),
        fit_canvas_to_parent: true,
        // Let the page keep its scroll and keyboard handling
        prevent_default_event_handling: false,
        ..default()
    }
}

/// Run the Bevy application
pub fn run(config: SceneConfig) {
    tracing::info!("Starting {}", config.window.title);

    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(primary_window(&config)),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: config.assets.root.clone(),
                    // Don't look for .meta files - static hosts don't have them
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                // Logging is installed by the entry point
                .disable::<LogPlugin>(),
        )
        .add_plugins(TunnelScenePlugin { config })
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_window_from_config() {
        let mut config = SceneConfig::default();
        config.window.width = 800;
        config.window.height = 600;

        let window = primary_window(&config);
        assert_eq!(window.title, "Helix Tunnel");
        assert_eq!(window.canvas.as_deref(), Some("#tunnel-canvas"));
        assert_eq!(window.resolution.physical_width(), 800);
        assert_eq!(window.resolution.physical_height(), 600);
        assert!(!window.prevent_default_event_handling);
    }

    #[test]
    fn test_host_page_canvas_receives_the_cursor() {
        let page = include_str!("../../../web/index.html");
        let canvas = SceneConfig::default().window.canvas;

        // Cursor moves reach the app only through the canvas' own events
        assert!(page.contains(&format!("id=\"{}\"", canvas.trim_start_matches('#'))));
        assert!(!page.contains("pointer-events: none"));
    }
}
