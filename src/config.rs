//! Simulation tuning
//!
//! Every constant the simulation reads at runtime lives here so a run can be
//! reconfigured from a JSON file. Missing fields fall back to `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Runtime configuration for a [`Simulation`](crate::sim::Simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Run seed; terrain and debris randomness derive from it
    pub seed: u64,

    // === Terrain ===
    pub map_width: usize,
    pub map_height: usize,
    /// Noise octaves combined into the surface profile
    pub octaves: u32,
    /// Octave weight divisor
    pub bias: f32,

    // === Physics ===
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Physics passes per tick
    pub substeps: u32,
    /// Speed under which an entity is considered at rest
    pub rest_speed: f32,

    // === Turn flow ===
    /// Drop point of the player's unit
    pub spawn_point: Vec2,
    /// Aim rotation speed (radians/s)
    pub aim_rate: f32,
    /// Charge gained per second while fire is held
    pub charge_rate: f32,
    /// Projectile speed at full charge
    pub launch_speed: f32,

    // === Camera ===
    pub camera_smoothing: f32,
    pub camera_scroll_speed: f32,
    pub camera_edge_margin: f32,

    // === Sandbox ===
    /// Radius of the pointer-triggered detonation
    pub sandbox_blast_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,

            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            octaves: TERRAIN_OCTAVES,
            bias: TERRAIN_BIAS,

            gravity: GRAVITY,
            substeps: PHYSICS_SUBSTEPS,
            rest_speed: REST_SPEED,

            spawn_point: Vec2::new(UNIT_SPAWN_X, UNIT_SPAWN_Y),
            aim_rate: AIM_RATE,
            charge_rate: CHARGE_RATE,
            launch_speed: LAUNCH_SPEED,

            camera_smoothing: CAMERA_SMOOTHING,
            camera_scroll_speed: CAMERA_SCROLL_SPEED,
            camera_edge_margin: CAMERA_EDGE_MARGIN,

            sandbox_blast_radius: SANDBOX_BLAST_RADIUS,
        }
    }
}

impl SimConfig {
    /// Default config with the given run seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(SimError::InvalidDimensions {
                width: self.map_width,
                height: self.map_height,
            });
        }
        if self.octaves == 0 {
            return Err(SimError::InvalidConfig("octaves must be at least 1".into()));
        }
        if self.bias.is_nan() || self.bias <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "bias must be positive (got {})",
                self.bias
            )));
        }
        if self.substeps == 0 {
            return Err(SimError::InvalidConfig("substeps must be at least 1".into()));
        }
        if !self.gravity.is_finite() || !self.rest_speed.is_finite() || self.rest_speed < 0.0 {
            return Err(SimError::InvalidConfig(
                "gravity and rest_speed must be finite, rest_speed non-negative".into(),
            ));
        }
        if self.charge_rate.is_nan()
            || self.charge_rate <= 0.0
            || self.launch_speed.is_nan()
            || self.launch_speed < 0.0
        {
            return Err(SimError::InvalidConfig(
                "charge_rate must be positive and launch_speed non-negative".into(),
            ));
        }
        if !self.aim_rate.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "aim_rate must be finite (got {})",
                self.aim_rate
            )));
        }
        if !self.spawn_point.is_finite() {
            return Err(SimError::InvalidConfig("spawn_point must be finite".into()));
        }
        let camera = [
            self.camera_smoothing,
            self.camera_scroll_speed,
            self.camera_edge_margin,
        ];
        if camera.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SimError::InvalidConfig(
                "camera settings must be finite and non-negative".into(),
            ));
        }
        if !(0.0..=MAX_BLAST_RADIUS).contains(&self.sandbox_blast_radius) {
            return Err(SimError::InvalidConfig(format!(
                "sandbox_blast_radius must be within 0..={MAX_BLAST_RADIUS} (got {})",
                self.sandbox_blast_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "seed": 42, "map_width": 256 }"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.map_width, 256);
        assert_eq!(config.map_height, MAP_HEIGHT);
        assert_eq!(config.substeps, PHYSICS_SUBSTEPS);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SimConfig::with_seed(7);
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let err = SimConfig::from_json(r#"{ "map_height": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidDimensions { height: 0, .. }));
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let config = SimConfig {
            substeps: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let config = SimConfig {
            bias: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_huge_blast_radius() {
        let err = SimConfig::from_json(r#"{ "sandbox_blast_radius": 1e12 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));

        for radius in [-1.0, f32::NAN, f32::INFINITY] {
            let config = SimConfig {
                sandbox_blast_radius: radius,
                ..SimConfig::default()
            };
            assert!(config.validate().is_err(), "radius {radius} accepted");
        }

        let config = SimConfig {
            sandbox_blast_radius: MAX_BLAST_RADIUS,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_camera_and_aim() {
        let configs = [
            SimConfig {
                aim_rate: f32::NAN,
                ..SimConfig::default()
            },
            SimConfig {
                camera_smoothing: f32::INFINITY,
                ..SimConfig::default()
            },
            SimConfig {
                camera_scroll_speed: f32::NAN,
                ..SimConfig::default()
            },
            SimConfig {
                camera_edge_margin: -1.0,
                ..SimConfig::default()
            },
        ];
        for config in configs {
            assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SimError::ConfigIo(_)));
    }
}
