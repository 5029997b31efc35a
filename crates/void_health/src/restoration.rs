//! Restoration controller

use crate::damage::DamageType;
use crate::error::{HealthError, Result};
use crate::events::{BeforeRestore, DoDamage, DoRestore, OnFullyHealed, OnRestored};
use crate::vitality::{HealthGain, VitalityRecord};
use crate::world::HealthWorld;
use void_ecs::Entity;
use void_event::EventBus;

impl HealthWorld {
    /// Restore health through the cancelable `BeforeRestore` chain.
    ///
    /// Negative amounts are rejected. A non-positive result after modifiers
    /// is redirected to damage of type [`DamageType::Healing`].
    pub fn apply_restore(&mut self, request: DoRestore) -> Result<()> {
        self.restore_at_depth(request, 0)
    }

    /// Fill an entity's health to max, bypassing modifiers
    pub fn restore_full_health(&mut self, entity: Entity) -> Result<()> {
        self.checked_vitality(entity)?;
        let record = self
            .vitality
            .get_mut(entity)
            .ok_or(HealthError::NoVitality(entity))?;
        let gain = record.fill();
        publish_gain(entity, gain, None, &self.events);
        Ok(())
    }

    pub(crate) fn restore_at_depth(&mut self, request: DoRestore, depth: u32) -> Result<()> {
        if request.amount < 0 {
            return Err(HealthError::NegativeRestore(request.amount));
        }
        if request.amount == 0 {
            return Ok(());
        }
        self.check_redirect_depth(depth)?;
        self.checked_vitality(request.target)?;

        let event = BeforeRestore {
            entity: request.target,
            amount: request.amount,
            instigator: request.instigator,
        };
        let outcome = self.before_restore.collect(&event, request.amount as f32);
        let Some(value) = outcome.result_value() else {
            log::debug!("restore of {} consumed by a modifier", request.target);
            return Ok(());
        };

        let final_amount = value.floor() as i32;
        if final_amount > 0 {
            let record = self
                .vitality
                .get_mut(request.target)
                .ok_or(HealthError::NoVitality(request.target))?;
            restore_raw(
                record,
                request.target,
                final_amount,
                request.instigator,
                &self.events,
            );
            Ok(())
        } else {
            let mut damage = DoDamage::new(request.target, final_amount.saturating_neg())
                .with_type(DamageType::Healing);
            damage.instigator = request.instigator;
            self.damage_at_depth(damage, depth + 1)
        }
    }
}

/// Raise health without consulting modifiers and publish the outcome.
///
/// `OnRestored` is only sent when health actually rose.
pub(crate) fn restore_raw(
    record: &mut VitalityRecord,
    entity: Entity,
    amount: i32,
    instigator: Option<Entity>,
    events: &EventBus,
) -> HealthGain {
    let gain = record.gain(amount);
    publish_gain(entity, gain, instigator, events);
    gain
}

fn publish_gain(entity: Entity, gain: HealthGain, instigator: Option<Entity>, events: &EventBus) {
    if gain.delta > 0 {
        events.send(&OnRestored {
            entity,
            delta: gain.delta,
            instigator,
        });
    }
    if gain.became_full {
        log::trace!("{} fully healed", entity);
        events.send(&OnFullyHealed { entity, instigator });
    }
}
