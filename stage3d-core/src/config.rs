//! Configuration loading and validation

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_3, FRAC_PI_4};
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;
use crate::orbit::OrbitParameters;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub scatter: ScatterConfig,
    #[serde(default)]
    pub fan: FanConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Frame loop rate for the terminal host
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

fn default_target_fps() -> u32 {
    30
}

/// Orbit demo: markers circling the earth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    /// Earth radius plus marker clearance
    #[serde(default = "default_orbit_radius")]
    pub radius: f32,
    /// Radians per second
    #[serde(default = "default_angular_speed")]
    pub angular_speed: f32,
    #[serde(default = "default_phase_offset")]
    pub phase_offset: f32,
    /// How hard the heading is pulled toward the travel direction
    #[serde(default = "default_turn_scale")]
    pub turn_scale: f32,
}

impl OrbitConfig {
    pub fn parameters(&self) -> OrbitParameters {
        OrbitParameters {
            radius: self.radius,
            angular_speed: self.angular_speed,
            phase_offset: self.phase_offset,
            turn_scale: self.turn_scale,
        }
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: default_orbit_radius(),
            angular_speed: default_angular_speed(),
            phase_offset: default_phase_offset(),
            turn_scale: default_turn_scale(),
        }
    }
}

fn default_orbit_radius() -> f32 {
    3.3
}

fn default_angular_speed() -> f32 {
    0.5
}

fn default_phase_offset() -> f32 {
    FRAC_PI_4
}

fn default_turn_scale() -> f32 {
    1.0
}

/// Scatter demo: randomly placed meshes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    #[serde(default = "default_box_count")]
    pub box_count: usize,
    /// Meshes drawn from box, cone and torus
    #[serde(default = "default_other_count")]
    pub other_count: usize,
    /// Positions are drawn from [-pos_range, pos_range] on each axis
    #[serde(default = "default_pos_range")]
    pub pos_range: f32,
    #[serde(default = "default_max_scale")]
    pub max_scale: f32,
    /// Seconds between movement rerolls
    #[serde(default = "default_reshuffle_secs")]
    pub reshuffle_secs: f32,
    /// Fixed seed for a reproducible layout
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            box_count: default_box_count(),
            other_count: default_other_count(),
            pos_range: default_pos_range(),
            max_scale: default_max_scale(),
            reshuffle_secs: default_reshuffle_secs(),
            seed: None,
        }
    }
}

fn default_box_count() -> usize {
    100
}

fn default_other_count() -> usize {
    10
}

fn default_pos_range() -> f32 {
    10.0
}

fn default_max_scale() -> f32 {
    1.5
}

fn default_reshuffle_secs() -> f32 {
    2.0
}

/// Fan demo: swinging electric fan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanConfig {
    #[serde(default = "default_blade_count")]
    pub blade_count: usize,
    /// Head yaw per frame while swinging
    #[serde(default = "default_swing_speed")]
    pub swing_speed: f32,
    /// Head turns back once yaw leaves [-swing_limit, swing_limit]
    #[serde(default = "default_swing_limit")]
    pub swing_limit: f32,
    /// Blade spin per frame
    #[serde(default = "default_blade_speed")]
    pub blade_speed: f32,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            blade_count: default_blade_count(),
            swing_speed: default_swing_speed(),
            swing_limit: default_swing_limit(),
            blade_speed: default_blade_speed(),
        }
    }
}

fn default_blade_count() -> usize {
    3
}

fn default_swing_speed() -> f32 {
    0.01
}

fn default_swing_limit() -> f32 {
    FRAC_PI_3
}

fn default_blade_speed() -> f32 {
    0.07
}

impl Config {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.renderer.target_fps == 0 {
            return Err(invalid("renderer.target_fps", "must be at least 1"));
        }
        if !is_positive(self.orbit.radius) {
            return Err(invalid("orbit.radius", "must be positive"));
        }
        if !self.orbit.angular_speed.is_finite() || !self.orbit.turn_scale.is_finite() {
            return Err(invalid("orbit", "speeds must be finite"));
        }
        if !is_positive(self.scatter.pos_range) {
            return Err(invalid("scatter.pos_range", "must be positive"));
        }
        if !is_positive(self.scatter.max_scale - 1.0) {
            return Err(invalid("scatter.max_scale", "must be greater than 1"));
        }
        if !is_positive(self.scatter.reshuffle_secs) {
            return Err(invalid("scatter.reshuffle_secs", "must be positive"));
        }
        if self.fan.blade_count == 0 {
            return Err(invalid("fan.blade_count", "must be at least 1"));
        }
        if !is_positive(self.fan.swing_limit) {
            return Err(invalid("fan.swing_limit", "must be positive"));
        }
        Ok(())
    }
}

/// False for NaN as well as for zero and negatives
fn is_positive(value: f32) -> bool {
    value > 0.0
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Load configuration from `path`, falling back to defaults when it does not exist
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Config::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_demo_constants() {
        let config = Config::default();
        assert_eq!(config.renderer.target_fps, 30);
        assert_eq!(config.orbit.parameters(), OrbitParameters::default());
        assert_eq!(config.scatter.box_count + config.scatter.other_count, 110);
        assert_eq!(config.fan.blade_count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [orbit]
            angular_speed = 1.25

            [scatter]
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.orbit.angular_speed, 1.25);
        assert_eq!(config.orbit.radius, 3.3);
        assert_eq!(config.scatter.seed, Some(42));
        assert_eq!(config.scatter.box_count, 100);
        assert_eq!(config.fan, FanConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_toml_str("[orbit]\nradius = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "orbit.radius", .. }));

        let err = Config::from_toml_str("[renderer]\ntarget_fps = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "renderer.target_fps", .. }));

        let err = Config::from_toml_str("[scatter]\nmax_scale = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "scatter.max_scale", .. }));
    }

    #[test]
    fn test_parse_errors_surface() {
        let err = Config::from_toml_str("[orbit\nradius = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("stage3d.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fan]\nblade_count = 5").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fan.blade_count, 5);
    }
}
