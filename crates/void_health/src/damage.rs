//! Damage types and the damage controller

use crate::error::{HealthError, Result};
use crate::events::{BeforeDamaged, Destroy, DoDamage, DoRestore, OnDamaged};
use crate::world::HealthWorld;
use serde::{Deserialize, Serialize};
use void_ecs::Entity;

/// Types of damage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Physical damage (melee, projectiles, impacts)
    #[default]
    Physical,
    /// Fire damage
    Fire,
    /// Ice/cold damage
    Ice,
    /// Electric/shock damage
    Electric,
    /// Poison/toxic damage
    Poison,
    /// Energy/plasma damage
    Energy,
    /// True damage (ignores all resistances)
    True,
    /// Restoration that modifiers turned into harm
    Healing,
    /// Health removed because max health dropped below it
    MaxHealthReduction,
    /// Custom damage type
    Custom(u32),
}

impl DamageType {
    /// Whether resistances apply to this type
    ///
    /// `Healing` damage already went through the restore modifiers.
    pub fn is_resistible(&self) -> bool {
        !matches!(self, Self::True | Self::Healing | Self::MaxHealthReduction)
    }
}

impl HealthWorld {
    /// Damage an entity through the cancelable `BeforeDamaged` chain.
    ///
    /// Zero amounts and consumed chains are no-ops. A non-positive result
    /// after modifiers is redirected to restoration.
    pub fn apply_damage(&mut self, request: DoDamage) -> Result<()> {
        self.damage_at_depth(request, 0)
    }

    /// Damage from a vertical impact (landing)
    pub fn on_vertical_impact(&mut self, entity: Entity, velocity_y: f32) -> Result<()> {
        let record = self.checked_vitality(entity)?;
        let threshold = record.falling_speed_threshold;
        let multiplier = record.excess_speed_damage_multiplier;
        self.impact_damage(entity, velocity_y.abs(), threshold, multiplier)
    }

    /// Damage from a horizontal impact; `velocity` is the `[x, z]` ground-plane velocity
    pub fn on_horizontal_impact(&mut self, entity: Entity, velocity: [f32; 2]) -> Result<()> {
        let record = self.checked_vitality(entity)?;
        let threshold = record.horizontal_speed_threshold;
        let multiplier = record.excess_speed_damage_multiplier;
        let speed = (velocity[0] * velocity[0] + velocity[1] * velocity[1]).sqrt();
        self.impact_damage(entity, speed, threshold, multiplier)
    }

    fn impact_damage(
        &mut self,
        entity: Entity,
        speed: f32,
        threshold: f32,
        multiplier: f32,
    ) -> Result<()> {
        if speed <= threshold {
            return Ok(());
        }
        let damage = ((speed - threshold) * multiplier).floor() as i32;
        if damage > 0 {
            log::trace!("impact at speed {:.2} damages {} for {}", speed, entity, damage);
            self.apply_damage(DoDamage::new(entity, damage))?;
        }
        Ok(())
    }

    pub(crate) fn damage_at_depth(&mut self, request: DoDamage, depth: u32) -> Result<()> {
        if request.amount == 0 {
            return Ok(());
        }
        self.check_redirect_depth(depth)?;
        self.checked_vitality(request.target)?;

        let event = BeforeDamaged {
            entity: request.target,
            amount: request.amount,
            damage_type: request.damage_type,
            instigator: request.instigator,
            direct_cause: request.direct_cause,
        };
        let outcome = self.before_damaged.collect(&event, request.amount as f32);
        let Some(value) = outcome.result_value() else {
            log::debug!(
                "{:?} damage to {} consumed by a modifier",
                request.damage_type,
                request.target
            );
            return Ok(());
        };

        let final_amount = value.floor() as i32;
        if final_amount > 0 {
            self.inflict(&request, final_amount)
        } else {
            let mut restore = DoRestore::new(request.target, final_amount.saturating_neg());
            restore.instigator = request.instigator;
            self.restore_at_depth(restore, depth + 1)
        }
    }

    /// Lower health by a modified amount and publish the outcome
    fn inflict(&mut self, request: &DoDamage, amount: i32) -> Result<()> {
        let now = self.clock.now();
        let record = self
            .vitality
            .get_mut(request.target)
            .ok_or(HealthError::NoVitality(request.target))?;

        let delta = record.lose(amount);
        let destroy = record.is_depleted() && record.destroy_on_zero;

        self.events.send(&OnDamaged {
            entity: request.target,
            delta,
            full_amount: amount,
            damage_type: request.damage_type,
            instigator: request.instigator,
            at: now,
        });

        if destroy {
            log::debug!("{} reached zero health, requesting despawn", request.target);
            self.destroyed.send(Destroy {
                entity: request.target,
                instigator: request.instigator,
                direct_cause: request.direct_cause,
                damage_type: request.damage_type,
            });
        }
        Ok(())
    }

    pub(crate) fn check_redirect_depth(&self, depth: u32) -> Result<()> {
        if depth > self.config.max_redirects {
            log::warn!(
                "dropping request after {} damage/restore redirects (limit {})",
                depth,
                self.config.max_redirects
            );
            return Err(HealthError::RedirectLimit { depth });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{OnDamaged, OnRestored};
    use crate::vitality::VitalityRecord;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use void_event::{Modification, Priority};

    fn world_with(current: i32, max: i32) -> (HealthWorld, Entity) {
        let mut world = HealthWorld::default();
        let entity = world.spawn();
        world
            .insert_vitality(entity, VitalityRecord::with_health(current, max).unwrap())
            .unwrap();
        (world, entity)
    }

    fn record_damage(world: &mut HealthWorld) -> Arc<Mutex<Vec<OnDamaged>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        world
            .events_mut()
            .subscribe(move |e: &OnDamaged| sink.lock().push(e.clone()));
        seen
    }

    #[test]
    fn test_damage_reduces_health() {
        let (mut world, entity) = world_with(50, 100);
        let seen = record_damage(&mut world);

        world.apply_damage(DoDamage::new(entity, 10)).unwrap();

        assert_eq!(world.vitality(entity).unwrap().current(), 40);
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!((seen[0].delta, seen[0].full_amount), (10, 10));
    }

    #[test]
    fn test_zero_damage_is_silent() {
        let (mut world, entity) = world_with(50, 100);
        let seen = record_damage(&mut world);
        world.before_damaged_mut().subscribe(|_: &BeforeDamaged| {
            panic!("observers must not run for zero damage")
        });

        world.apply_damage(DoDamage::new(entity, 0)).unwrap();

        assert_eq!(world.vitality(entity).unwrap().current(), 50);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_overkill_reports_capped_delta() {
        let (mut world, entity) = world_with(40, 100);
        let seen = record_damage(&mut world);

        world.apply_damage(DoDamage::new(entity, 999)).unwrap();

        assert_eq!(world.vitality(entity).unwrap().current(), 0);
        let seen = seen.lock();
        assert_eq!((seen[0].delta, seen[0].full_amount), (40, 999));
        assert!(world.destroy_requests().is_empty());
    }

    #[test]
    fn test_fractional_result_is_floored() {
        let (mut world, entity) = world_with(50, 100);
        world
            .before_damaged_mut()
            .subscribe(|_: &BeforeDamaged| Modification::multiply(0.55));

        world.apply_damage(DoDamage::new(entity, 10)).unwrap();
        assert_eq!(world.vitality(entity).unwrap().current(), 45);
    }

    #[test]
    fn test_negative_result_redirects_to_restore() {
        let (mut world, entity) = world_with(50, 100);
        let restored = Arc::new(Mutex::new(Vec::new()));
        let sink = restored.clone();
        world
            .events_mut()
            .subscribe(move |e: &OnRestored| sink.lock().push(e.delta));
        world
            .before_damaged_mut()
            .subscribe(|_: &BeforeDamaged| Modification::multiply(-1.0));

        world.apply_damage(DoDamage::new(entity, 10)).unwrap();

        assert_eq!(world.vitality(entity).unwrap().current(), 60);
        assert_eq!(*restored.lock(), [10]);
    }

    #[test]
    fn test_observer_sees_request_details() {
        let (mut world, entity) = world_with(50, 100);
        let attacker = world.spawn();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        world.before_damaged_mut().subscribe_with_priority(
            move |e: &BeforeDamaged| {
                *sink.lock() = Some((e.damage_type, e.instigator));
                Modification::PASS
            },
            Priority::High,
        );

        world
            .apply_damage(
                DoDamage::new(entity, 5)
                    .with_type(DamageType::Fire)
                    .with_instigator(attacker),
            )
            .unwrap();

        assert_eq!(*seen.lock(), Some((DamageType::Fire, Some(attacker))));
    }

    #[test]
    fn test_missing_record_and_dead_entity() {
        let mut world = HealthWorld::default();
        let bare = world.spawn();
        assert_eq!(
            world.apply_damage(DoDamage::new(bare, 5)),
            Err(HealthError::NoVitality(bare))
        );

        let (mut world, entity) = world_with(10, 10);
        world.despawn(entity);
        assert_eq!(
            world.apply_damage(DoDamage::new(entity, 5)),
            Err(HealthError::DeadEntity(entity))
        );
    }

    #[test]
    fn test_impact_damage() {
        let mut world = HealthWorld::default();
        let entity = world.spawn();
        let record = VitalityRecord::new(100)
            .unwrap()
            .with_speed_thresholds(20.0, 15.0, 2.0);
        world.insert_vitality(entity, record).unwrap();

        world.on_vertical_impact(entity, -19.0).unwrap();
        assert_eq!(world.vitality(entity).unwrap().current(), 100);

        world.on_vertical_impact(entity, -25.5).unwrap();
        assert_eq!(world.vitality(entity).unwrap().current(), 89);

        world.on_horizontal_impact(entity, [12.0, 16.0]).unwrap();
        assert_eq!(world.vitality(entity).unwrap().current(), 79);
    }

    #[test]
    fn test_resistibility() {
        assert!(DamageType::Fire.is_resistible());
        assert!(!DamageType::True.is_resistible());
        assert!(!DamageType::Healing.is_resistible());
        assert!(!DamageType::MaxHealthReduction.is_resistible());
    }
}
