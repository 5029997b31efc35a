//! Requests, collector events and notifications of the health pipeline
//!
//! - `Do*` structs are requests handed to [`HealthWorld`](crate::HealthWorld)
//! - `Before*` and [`ChangeMaxHealth`] are collector events: observers shape
//!   the proposed amount through a [`CollectorChain`](void_event::CollectorChain)
//! - `On*`, [`MaxHealthChanged`] and [`Destroy`] are notifications; readers
//!   must not mutate health state in response

use crate::damage::DamageType;
use crate::regen::ActionId;
use crate::time::GameInstant;
use void_ecs::Entity;

/// Request to damage an entity
#[derive(Debug, Clone, PartialEq)]
pub struct DoDamage {
    pub target: Entity,
    /// Raw amount before modifiers. Negative amounts heal.
    pub amount: i32,
    pub damage_type: DamageType,
    /// Entity responsible for the damage (if any)
    pub instigator: Option<Entity>,
    /// Entity that directly delivered it, e.g. a projectile (if any)
    pub direct_cause: Option<Entity>,
}

impl DoDamage {
    /// Physical damage with no instigator
    pub fn new(target: Entity, amount: i32) -> Self {
        Self {
            target,
            amount,
            damage_type: DamageType::Physical,
            instigator: None,
            direct_cause: None,
        }
    }

    pub fn with_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn with_instigator(mut self, instigator: Entity) -> Self {
        self.instigator = Some(instigator);
        self
    }

    pub fn with_direct_cause(mut self, cause: Entity) -> Self {
        self.direct_cause = Some(cause);
        self
    }
}

/// Request to restore health. The amount must be non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct DoRestore {
    pub target: Entity,
    pub amount: i32,
    pub instigator: Option<Entity>,
}

impl DoRestore {
    pub fn new(target: Entity, amount: i32) -> Self {
        Self {
            target,
            amount,
            instigator: None,
        }
    }

    pub fn with_instigator(mut self, instigator: Entity) -> Self {
        self.instigator = Some(instigator);
        self
    }
}

/// Collector event raised before damage is applied
#[derive(Debug, Clone, PartialEq)]
pub struct BeforeDamaged {
    pub entity: Entity,
    /// Raw amount the chain started from
    pub amount: i32,
    pub damage_type: DamageType,
    pub instigator: Option<Entity>,
    pub direct_cause: Option<Entity>,
}

/// Health was lowered
#[derive(Debug, Clone, PartialEq)]
pub struct OnDamaged {
    pub entity: Entity,
    /// Health actually removed
    pub delta: i32,
    /// Damage after modifiers, before capping at current health
    pub full_amount: i32,
    pub damage_type: DamageType,
    pub instigator: Option<Entity>,
    /// Game time of the hit
    pub at: GameInstant,
}

/// Collector event raised before a restoration is applied
#[derive(Debug, Clone, PartialEq)]
pub struct BeforeRestore {
    pub entity: Entity,
    pub amount: i32,
    pub instigator: Option<Entity>,
}

/// Health was raised
#[derive(Debug, Clone, PartialEq)]
pub struct OnRestored {
    pub entity: Entity,
    /// Health actually added
    pub delta: i32,
    pub instigator: Option<Entity>,
}

/// Health moved from below max to max
#[derive(Debug, Clone, PartialEq)]
pub struct OnFullyHealed {
    pub entity: Entity,
    pub instigator: Option<Entity>,
}

/// Collector event asking for the current regeneration rate (hp/s) of one action
#[derive(Debug, Clone, PartialEq)]
pub struct BeforeRegen {
    pub entity: Entity,
    pub id: ActionId,
    /// Game time of the tick
    pub now: GameInstant,
}

/// Collector event raised before max health changes
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeMaxHealth {
    pub entity: Entity,
    /// Requested new max before modifiers
    pub requested: i32,
}

/// Max health changed
#[derive(Debug, Clone, PartialEq)]
pub struct MaxHealthChanged {
    pub entity: Entity,
    pub old_value: i32,
    pub new_value: i32,
}

impl MaxHealthChanged {
    /// Scaling factor `new / old`, always greater than zero
    pub fn factor(&self) -> f32 {
        self.new_value as f32 / self.old_value as f32
    }
}

/// Despawn request for an entity whose health reached zero
#[derive(Debug, Clone, PartialEq)]
pub struct Destroy {
    pub entity: Entity,
    pub instigator: Option<Entity>,
    pub direct_cause: Option<Entity>,
    pub damage_type: DamageType,
}
