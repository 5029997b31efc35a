//! Vitality record: per-entity health state
//!
//! `current` and `max` are private. Every mutation goes through a method that
//! keeps `0 <= current <= max` and `max > 0`; the controllers are the only
//! callers of the mutating methods.

use crate::config::VitalityDefaults;
use crate::error::{HealthError, Result};
use serde::{Deserialize, Serialize};

/// Health state and impact thresholds of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VitalitySnapshot")]
pub struct VitalityRecord {
    current: i32,
    max: i32,
    /// Vertical impact speed above which damage is inflicted
    pub falling_speed_threshold: f32,
    /// Horizontal impact speed above which damage is inflicted
    pub horizontal_speed_threshold: f32,
    /// Damage per unit of speed beyond a threshold
    pub excess_speed_damage_multiplier: f32,
    /// Request despawn when health reaches zero
    pub destroy_on_zero: bool,
}

/// Result of raising current health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthGain {
    /// Health actually added after capping at max
    pub delta: i32,
    /// The record was below max before and is at max now
    pub became_full: bool,
}

/// Result of changing max health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxHealthChange {
    pub old_max: i32,
    pub new_max: i32,
    /// Current health removed to fit under the new max
    pub removed: i32,
}

impl VitalityRecord {
    /// A record at full health with default thresholds
    pub fn new(max: i32) -> Result<Self> {
        Self::with_health(max, max)
    }

    /// A record with explicit current and max health
    pub fn with_health(current: i32, max: i32) -> Result<Self> {
        Self::from_defaults(&VitalityDefaults {
            max_health: max,
            ..VitalityDefaults::default()
        })?
        .with_current(current)
    }

    /// A full record built from configuration defaults
    pub fn from_defaults(defaults: &VitalityDefaults) -> Result<Self> {
        if defaults.max_health <= 0 {
            return Err(HealthError::NonPositiveMaxHealth(defaults.max_health));
        }
        Ok(Self {
            current: defaults.max_health,
            max: defaults.max_health,
            falling_speed_threshold: defaults.falling_speed_threshold,
            horizontal_speed_threshold: defaults.horizontal_speed_threshold,
            excess_speed_damage_multiplier: defaults.excess_speed_damage_multiplier,
            destroy_on_zero: defaults.destroy_on_zero,
        })
    }

    /// Replace current health. Values outside `0..=max` are rejected.
    pub fn with_current(mut self, current: i32) -> Result<Self> {
        if !(0..=self.max).contains(&current) {
            return Err(HealthError::InvalidHealth {
                current,
                max: self.max,
            });
        }
        self.current = current;
        Ok(self)
    }

    pub fn with_destroy_on_zero(mut self, destroy: bool) -> Self {
        self.destroy_on_zero = destroy;
        self
    }

    /// Set impact thresholds and the excess-speed damage multiplier
    pub fn with_speed_thresholds(mut self, falling: f32, horizontal: f32, multiplier: f32) -> Self {
        self.falling_speed_threshold = falling;
        self.horizontal_speed_threshold = horizontal;
        self.excess_speed_damage_multiplier = multiplier;
        self
    }

    #[inline]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Health as a fraction of max (0.0 - 1.0)
    pub fn health_percent(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    /// Lower current health by at most `amount`; returns the amount removed
    pub(crate) fn lose(&mut self, amount: i32) -> i32 {
        let delta = amount.clamp(0, self.current);
        self.current -= delta;
        delta
    }

    /// Raise current health by at most `amount`, capped at max
    pub(crate) fn gain(&mut self, amount: i32) -> HealthGain {
        let was_full = self.is_full();
        let delta = amount.clamp(0, self.max - self.current);
        self.current += delta;
        HealthGain {
            delta,
            became_full: !was_full && self.is_full(),
        }
    }

    /// Raise current health to max
    pub(crate) fn fill(&mut self) -> HealthGain {
        self.gain(self.max - self.current)
    }

    /// Set a new max, lowering current health if it no longer fits
    pub(crate) fn set_max(&mut self, new_max: i32) -> Result<MaxHealthChange> {
        if new_max <= 0 {
            return Err(HealthError::NonPositiveMaxHealth(new_max));
        }
        let old_max = self.max;
        self.max = new_max;
        let removed = self.lose(self.current - new_max);
        Ok(MaxHealthChange {
            old_max,
            new_max,
            removed,
        })
    }
}

/// Unvalidated wire shape of [`VitalityRecord`]
#[derive(Deserialize)]
struct VitalitySnapshot {
    current: i32,
    max: i32,
    falling_speed_threshold: f32,
    horizontal_speed_threshold: f32,
    excess_speed_damage_multiplier: f32,
    destroy_on_zero: bool,
}

impl TryFrom<VitalitySnapshot> for VitalityRecord {
    type Error = HealthError;

    fn try_from(raw: VitalitySnapshot) -> Result<Self> {
        Ok(VitalityRecord::with_health(raw.current, raw.max)?
            .with_speed_thresholds(
                raw.falling_speed_threshold,
                raw.horizontal_speed_threshold,
                raw.excess_speed_damage_multiplier,
            )
            .with_destroy_on_zero(raw.destroy_on_zero))
    }
}
