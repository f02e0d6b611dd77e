//! Tunnel Viewer - Scroll-driven flight through a glass helix tunnel
//!
//! The same Bevy app runs as a native window (`helix-tunnel` binary) and as
//! a WASM module rendering into a canvas behind a scrollable page.

pub mod app;

pub use app::run;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    // No filesystem in the browser; the page ships the default scene
    run(tunnel_core::SceneConfig::default());
}
