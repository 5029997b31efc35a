//! Void Health - Health, Damage and Regeneration Pipeline
//!
//! This crate provides the health simulation for the Void Engine.
//!
//! # Features
//!
//! - Vitality records with clamped current/max health
//! - Cancelable damage and restoration with priority-ordered modifiers
//! - Named, time-bounded regeneration effects on a fixed tick cadence
//! - Base regeneration with a post-hit cool-down
//! - Percentage damage resistances, impact damage, max-health changes
//!
//! # Example
//!
//! ```
//! use void_health::prelude::*;
//! use void_event::Modification;
//!
//! let mut world = HealthWorld::default();
//! let player = world.spawn();
//! world.insert_vitality(player, VitalityRecord::with_health(50, 100)?)?;
//!
//! // Armor halves every hit
//! world
//!     .before_damaged_mut()
//!     .subscribe(|_: &BeforeDamaged| Modification::multiply(0.5));
//!
//! world.apply_damage(DoDamage::new(player, 20).with_type(DamageType::Fire))?;
//! assert_eq!(world.vitality(player).map(|v| v.current()), Some(40));
//!
//! // Regenerate 5 health per second for two seconds
//! let potion = ActionId::new("potion:regen")?;
//! world.register_regen(player, potion.clone(), GameDuration::from_millis(2000))?;
//! world.before_regen_mut().subscribe(move |e: &BeforeRegen| {
//!     if e.id == potion { Modification::add(5.0) } else { Modification::PASS }
//! });
//! for _ in 0..10 {
//!     world.update(200);
//! }
//! assert_eq!(world.vitality(player).map(|v| v.current()), Some(50));
//! # Ok::<(), void_health::HealthError>(())
//! ```

pub mod base_regen;
pub mod config;
pub mod damage;
pub mod error;
pub mod events;
pub mod regen;
pub mod resistance;
pub mod restoration;
pub mod time;
pub mod vitality;
pub mod world;

pub mod prelude {
    pub use crate::base_regen::BaseRegen;
    pub use crate::config::{HealthConfig, VitalityDefaults};
    pub use crate::damage::DamageType;
    pub use crate::error::{HealthError, Result};
    pub use crate::events::*;
    pub use crate::regen::{ActionId, RegenScheduler, RegenTarget, TickReport, BASE_REGEN_ID};
    pub use crate::resistance::DamageResistance;
    pub use crate::time::{Expiration, GameClock, GameDuration, GameInstant};
    pub use crate::vitality::VitalityRecord;
    pub use crate::world::HealthWorld;
}

pub use prelude::*;
