//! Scene configuration loading and validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::curve::CurveKind;
use crate::extrude::ExtrudeOptions;
use crate::path::HelixPath;
use crate::rig::CameraRig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub path: PathConfig,
    #[serde(default)]
    pub tube: TubeConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub trail: TrailConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// CSS selector of the canvas when running in a browser
    #[serde(default = "default_canvas")]
    pub canvas: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            canvas: default_canvas(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_title() -> String {
    "Helix Tunnel".to_string()
}

fn default_canvas() -> String {
    "#tunnel-canvas".to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Distance behind the path point along the tangent
    #[serde(default = "default_trail_distance")]
    pub trail_distance: f32,
    /// Height above the path point
    #[serde(default = "default_lift")]
    pub lift: f32,
    /// Screen-space transmission steps for the translucent tube
    #[serde(default = "default_transmission_steps")]
    pub transmission_steps: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            trail_distance: default_trail_distance(),
            lift: default_lift(),
            transmission_steps: default_transmission_steps(),
        }
    }
}

impl CameraConfig {
    pub fn rig(&self) -> CameraRig {
        CameraRig {
            trail_distance: self.trail_distance,
            lift: self.lift,
        }
    }
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    400.0
}

fn default_trail_distance() -> f32 {
    5.0
}

fn default_lift() -> f32 {
    3.0
}

fn default_transmission_steps() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(flatten)]
    pub helix: HelixPath,
    /// Resolution of the arc-length lookup table
    #[serde(default = "default_arc_length_divisions")]
    pub arc_length_divisions: usize,
    #[serde(default)]
    pub kind: CurveKind,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            helix: HelixPath::default(),
            arc_length_divisions: default_arc_length_divisions(),
            kind: CurveKind::default(),
        }
    }
}

fn default_arc_length_divisions() -> usize {
    200
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeConfig {
    /// Cross-section width, along the frame normal
    #[serde(default = "default_tube_width")]
    pub width: f32,
    /// Cross-section height, along the frame binormal
    #[serde(default = "default_tube_height")]
    pub height: f32,
    #[serde(default = "default_steps")]
    pub steps: usize,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            width: default_tube_width(),
            height: default_tube_height(),
            steps: default_steps(),
        }
    }
}

impl TubeConfig {
    pub fn extrude_options(&self) -> ExtrudeOptions {
        ExtrudeOptions {
            steps: self.steps,
            caps: true,
        }
    }
}

fn default_tube_width() -> f32 {
    4.0
}

fn default_tube_height() -> f32 {
    0.25
}

fn default_steps() -> usize {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    /// sRGB base color
    #[serde(default = "default_white")]
    pub color: [f32; 3],
    #[serde(default = "default_transmission")]
    pub transmission: f32,
    #[serde(default = "default_ior")]
    pub ior: f32,
    #[serde(default = "default_roughness")]
    pub roughness: f32,
    #[serde(default = "default_thickness")]
    pub thickness: f32,
    #[serde(default = "default_true")]
    pub double_sided: bool,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: default_white(),
            transmission: default_transmission(),
            ior: default_ior(),
            roughness: default_roughness(),
            thickness: default_thickness(),
            double_sided: true,
        }
    }
}

fn default_white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_transmission() -> f32 {
    1.0
}

fn default_ior() -> f32 {
    5.0
}

fn default_roughness() -> f32 {
    0.15
}

fn default_thickness() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Equirectangular HDR panorama, relative to the asset root
    #[serde(default = "default_hdr")]
    pub hdr: Option<String>,
    /// Edge length of each generated cube face
    #[serde(default = "default_face_size")]
    pub face_size: u32,
    /// Skybox brightness in cd/m^2
    #[serde(default = "default_brightness")]
    pub brightness: f32,
    /// Image-based lighting intensity
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            hdr: default_hdr(),
            face_size: default_face_size(),
            brightness: default_brightness(),
            intensity: default_intensity(),
        }
    }
}

fn default_hdr() -> Option<String> {
    Some("textures/qwantani_dawn_puresky_1k.hdr".to_string())
}

fn default_face_size() -> u32 {
    512
}

fn default_brightness() -> f32 {
    1000.0
}

fn default_intensity() -> f32 {
    900.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// glTF/GLB file, relative to the asset root
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            position: [0.0; 3],
            scale: default_scale(),
        }
    }
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of particles in the ring buffer
    #[serde(default = "default_count")]
    pub count: usize,
    /// Fraction of the remaining distance the head covers each frame
    #[serde(default = "default_follow")]
    pub follow: f32,
    /// Distance in front of the camera where the cursor is unprojected
    #[serde(default = "default_depth")]
    pub depth: f32,
    /// Radius of the newest particle
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default = "default_trail_color")]
    pub color: [f32; 3],
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: default_count(),
            follow: default_follow(),
            depth: default_depth(),
            size: default_size(),
            color: default_trail_color(),
        }
    }
}

fn default_count() -> usize {
    40
}

fn default_follow() -> f32 {
    0.35
}

fn default_depth() -> f32 {
    4.0
}

fn default_size() -> f32 {
    0.05
}

fn default_trail_color() -> [f32; 3] {
    [1.0, 0.85, 0.6]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Virtual page height in viewports, for hosts without a document
    #[serde(default = "default_pages")]
    pub pages: f32,
    /// Pixels per wheel line
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            line_height: default_line_height(),
        }
    }
}

fn default_pages() -> f32 {
    10.0
}

fn default_line_height() -> f32 {
    40.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory assets are loaded from
    #[serde(default = "default_asset_root")]
    pub root: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
        }
    }
}

fn default_asset_root() -> String {
    "assets".to_string()
}

impl SceneConfig {
    /// Reject values the scene cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return invalid("camera.fov_degrees must be in (0, 180)");
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return invalid("camera.near must be positive and below camera.far");
        }
        if self.path.helix.segments == 0 {
            return invalid("path.segments must be at least 1");
        }
        if self.path.arc_length_divisions == 0 {
            return invalid("path.arc_length_divisions must be at least 1");
        }
        if self.tube.steps == 0 {
            return invalid("tube.steps must be at least 1");
        }
        if self.tube.width <= 0.0 || self.tube.height <= 0.0 {
            return invalid("tube.width and tube.height must be positive");
        }
        if self.environment.face_size == 0 {
            return invalid("environment.face_size must be at least 1");
        }
        if self.model.scale <= 0.0 {
            return invalid("model.scale must be positive");
        }
        if self.trail.count == 0 {
            return invalid("trail.count must be at least 1");
        }
        if !(self.trail.follow > 0.0 && self.trail.follow <= 1.0) {
            return invalid("trail.follow must be in (0, 1]");
        }
        if self.scroll.pages < 1.0 {
            return invalid("scroll.pages must be at least 1");
        }
        Ok(())
    }
}

/// Load configuration from file, falling back to defaults when it is missing
pub fn load_config(path: &Path) -> Result<SceneConfig, ConfigError> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: SceneConfig = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        config
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        SceneConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(&SceneConfig::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 400.0);
        assert_eq!(config.path.helix.segments, 900);
        assert_eq!(config.path.helix.length, 1000.0);
        assert_eq!(config.path.helix.radius, 50.0);
        assert_eq!(config.tube.steps, 300);
        assert_eq!(config.material.ior, 5.0);
        assert_eq!(config.material.roughness, 0.15);
        assert!(config.model.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tunnel.toml");
        std::fs::write(
            &path,
            r#"
[path]
segments = 120
kind = { type = "uniform", tension = 0.5 }

[model]
path = "models/ship.glb"
scale = 0.5

[trail]
enabled = false
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.path.helix.segments, 120);
        assert_eq!(config.path.helix.radius, 50.0);
        assert_eq!(config.path.kind, CurveKind::Uniform { tension: 0.5 });
        assert_eq!(config.model.path.as_deref(), Some("models/ship.glb"));
        assert_eq!(config.model.scale, 0.5);
        assert!(!config.trail.enabled);
        assert_eq!(config.trail.count, 40);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tunnel.toml");
        std::fs::write(&path, "[camera\nfov_degrees = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tunnel.toml");
        std::fs::write(&path, "[camera]\nnear = 500.0\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));

        let mut config = SceneConfig::default();
        config.tube.steps = 0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.trail.follow = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_saved_defaults_load_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tunnel.toml");
        save_default_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), SceneConfig::default());
    }
}
