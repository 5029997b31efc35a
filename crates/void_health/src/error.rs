//! Error types for the health pipeline

use thiserror::Error;
use void_core::NameError;
use void_ecs::Entity;

/// Health pipeline errors
///
/// Every variant is a rejected request; no state was changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HealthError {
    /// Restoration requests must not carry a negative amount
    #[error("Restore amount must be non-negative, got {0} (send a damage request instead)")]
    NegativeRestore(i32),

    /// Max health must stay strictly positive
    #[error("Max health must be positive, got {0}")]
    NonPositiveMaxHealth(i32),

    /// A record was built with current health outside `0..=max`
    #[error("Current health {current} is outside 0..={max}")]
    InvalidHealth { current: i32, max: i32 },

    /// Regeneration action ids must be valid names
    #[error("Invalid action id: {0}")]
    InvalidActionId(#[from] NameError),

    /// The target has no vitality record
    #[error("Entity {0} has no vitality record")]
    NoVitality(Entity),

    /// The target handle no longer refers to a live entity
    #[error("Entity {0} is not alive")]
    DeadEntity(Entity),

    /// Damage and restoration kept redirecting into each other
    #[error("Damage/restore redirect limit exceeded at depth {depth}")]
    RedirectLimit { depth: u32 },

    /// Configuration failed to parse or validate
    #[error("Invalid health configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for health operations
pub type Result<T> = std::result::Result<T, HealthError>;
