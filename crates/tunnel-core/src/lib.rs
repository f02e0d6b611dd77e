//! Tunnel Core - Geometry, camera math and configuration
//!
//! This crate provides the renderer-independent parts of the helix tunnel:
//! - Catmull-Rom curve evaluation with arc-length queries and frames
//! - Helix path generation and cross-section extrusion along it
//! - Scroll-to-progress mapping and the chase-camera rig
//! - The cursor particle trail buffer
//! - Equirectangular to cubemap conversion for the environment
//! - TOML scene configuration

pub mod config;
pub mod curve;
pub mod envmap;
pub mod extrude;
pub mod path;
pub mod rig;
pub mod scroll;
pub mod shape;
pub mod trail;

pub use config::{load_config, ConfigError, SceneConfig};
pub use curve::{CatmullRomCurve, CurveError, CurveKind, Frames};
pub use envmap::{equirect_to_cube, CubeFaces, EnvMapError};
pub use extrude::{extrude, ExtrudeError, ExtrudeOptions, ExtrudedGeometry};
pub use path::HelixPath;
pub use rig::{CameraPose, CameraRig};
pub use scroll::{progress_from_scroll, VirtualScroll};
pub use shape::{CrossSection, ShapeError};
pub use trail::Trail;
