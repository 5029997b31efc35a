//! Health pipeline configuration

use crate::error::{HealthError, Result};
use serde::{Deserialize, Serialize};

/// Defaults applied to vitality records created from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalityDefaults {
    /// Maximum (and starting) health
    pub max_health: i32,
    /// Vertical impact speed above which damage is inflicted
    pub falling_speed_threshold: f32,
    /// Horizontal impact speed above which damage is inflicted
    pub horizontal_speed_threshold: f32,
    /// Damage per unit of speed beyond a threshold
    pub excess_speed_damage_multiplier: f32,
    /// Request despawn when health reaches zero
    pub destroy_on_zero: bool,
}

impl Default for VitalityDefaults {
    fn default() -> Self {
        Self {
            max_health: 20,
            falling_speed_threshold: 20.0,
            horizontal_speed_threshold: 20.0,
            excess_speed_damage_multiplier: 10.0,
            destroy_on_zero: false,
        }
    }
}

/// Health pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Game time between regeneration ticks, in milliseconds
    pub regen_tick_interval_ms: u64,
    /// How many times one request may flip between damage and restoration
    pub max_redirects: u32,
    /// Defaults for new vitality records
    pub vitality: VitalityDefaults,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            regen_tick_interval_ms: 200,
            max_redirects: 1,
            vitality: VitalityDefaults::default(),
        }
    }
}

impl HealthConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| HealthError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.regen_tick_interval_ms == 0 {
            return Err(HealthError::InvalidConfig(
                "regen_tick_interval_ms must be greater than zero".into(),
            ));
        }
        if self.vitality.max_health <= 0 {
            return Err(HealthError::InvalidConfig(format!(
                "vitality.max_health must be positive, got {}",
                self.vitality.max_health
            )));
        }
        Ok(())
    }
}
