//! Page scroll to path progress
//!
//! In the browser the canvas sits behind a tall document, so progress comes
//! straight from the window scroll position. Native windows have no
//! document; wheel and paging keys drive a [`VirtualScroll`] instead.

use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use bevy::input::mouse::{AccumulatedMouseScroll, MouseScrollUnit};
#[cfg(not(target_arch = "wasm32"))]
use bevy::window::PrimaryWindow;
#[cfg(not(target_arch = "wasm32"))]
use tunnel_core::VirtualScroll;

use crate::camera::PathProgress;
#[cfg(not(target_arch = "wasm32"))]
use crate::SceneSettings;
use crate::TunnelSet;

pub struct ScrollPlugin;

impl Plugin for ScrollPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(Startup, init_page_scroll).add_systems(
            Update,
            (resize_page_scroll, wheel_scroll, key_scroll, publish_progress)
                .chain()
                .in_set(TunnelSet::Input),
        );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Update, document_scroll.in_set(TunnelSet::Input));
    }
}

fn set_progress(progress: &mut ResMut<PathProgress>, value: f32) {
    // Avoid tripping change detection when nothing moved
    if progress.0 != value {
        progress.0 = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn document_scroll(mut progress: ResMut<PathProgress>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(body) = window.document().and_then(|d| d.body()) else {
        return;
    };

    let scroll_y = window.scroll_y().unwrap_or(0.0) as f32;
    let inner_height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0) as f32;

    let value =
        tunnel_core::progress_from_scroll(scroll_y, body.scroll_height() as f32, inner_height);
    set_progress(&mut progress, value);
}

/// Scroll state of the virtual page on native hosts
#[cfg(not(target_arch = "wasm32"))]
#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct PageScroll(pub VirtualScroll);

#[cfg(not(target_arch = "wasm32"))]
fn init_page_scroll(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let height = windows
        .single()
        .map(|w| w.height())
        .unwrap_or(settings.window.height as f32);
    commands.insert_resource(PageScroll(VirtualScroll::new(settings.scroll.pages, height)));
}

#[cfg(not(target_arch = "wasm32"))]
fn resize_page_scroll(
    scroll: Option<ResMut<PageScroll>>,
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
) {
    let (Some(mut scroll), Ok(window)) = (scroll, windows.single()) else {
        return;
    };
    let height = window.height();
    if scroll.viewport_height() != height {
        scroll.resize(height);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn wheel_scroll(
    scroll: Option<ResMut<PageScroll>>,
    wheel: Res<AccumulatedMouseScroll>,
    settings: Res<SceneSettings>,
) {
    let Some(mut scroll) = scroll else {
        return;
    };
    if wheel.delta.y == 0.0 {
        return;
    }

    let pixels = match wheel.unit {
        MouseScrollUnit::Line => wheel.delta.y * settings.scroll.line_height,
        MouseScrollUnit::Pixel => wheel.delta.y,
    };
    // Wheel up moves toward the top of the page
    scroll.scroll_by(-pixels);
}

#[cfg(not(target_arch = "wasm32"))]
fn key_scroll(
    scroll: Option<ResMut<PageScroll>>,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<SceneSettings>,
) {
    let Some(mut scroll) = scroll else {
        return;
    };

    let line = settings.scroll.line_height;
    let page = scroll.viewport_height() * 0.9;
    for key in keys.get_just_pressed() {
        match key {
            KeyCode::ArrowDown => scroll.scroll_by(line),
            KeyCode::ArrowUp => scroll.scroll_by(-line),
            KeyCode::PageDown | KeyCode::Space => scroll.scroll_by(page),
            KeyCode::PageUp => scroll.scroll_by(-page),
            KeyCode::Home => scroll.scroll_to(0.0),
            KeyCode::End => scroll.scroll_to(f32::MAX),
            _ => {}
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn publish_progress(scroll: Option<Res<PageScroll>>, mut progress: ResMut<PathProgress>) {
    if let Some(scroll) = scroll {
        set_progress(&mut progress, scroll.progress());
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use tunnel_core::SceneConfig;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<AccumulatedMouseScroll>()
            .configure_sets(Update, TunnelSet::Input)
            .init_resource::<PathProgress>()
            .insert_resource(SceneSettings(SceneConfig::default()))
            .add_plugins(ScrollPlugin);
        app
    }

    #[test]
    fn test_virtual_page_starts_at_top() {
        let mut app = app();
        app.update();

        let scroll = app.world().resource::<PageScroll>();
        // No window: the configured height is used
        assert_eq!(scroll.viewport_height(), 720.0);
        assert_eq!(scroll.offset(), 0.0);
        assert_eq!(app.world().resource::<PathProgress>().0, 0.0);
    }

    #[test]
    fn test_wheel_lines_scroll_the_page() {
        let mut app = app();
        app.update();

        // Three lines down: 120 of the 6480 scrollable pixels
        app.world_mut().resource_mut::<AccumulatedMouseScroll>().delta = Vec2::new(0.0, -3.0);
        app.update();

        let progress = app.world().resource::<PathProgress>().0;
        assert!((progress - 120.0 / 6480.0).abs() < 1e-6);
    }

    #[test]
    fn test_end_key_reaches_the_end_of_the_path() {
        let mut app = app();
        app.update();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::End);
        app.update();
        assert_eq!(app.world().resource::<PathProgress>().0, 1.0);

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.release(KeyCode::End);
            keys.clear();
            keys.press(KeyCode::Home);
        }
        app.update();
        assert_eq!(app.world().resource::<PathProgress>().0, 0.0);
    }
}
