//! The health simulation context
//!
//! [`HealthWorld`] owns the entity store, the health components, the game
//! clock, the collector chains and notification bus, and the regeneration
//! scheduler. All controller operations are methods on it and run
//! synchronously on the caller's thread.

use crate::base_regen::{self, BaseRegen};
use crate::config::HealthConfig;
use crate::error::{HealthError, Result};
use crate::events::{
    BeforeDamaged, BeforeRegen, BeforeRestore, ChangeMaxHealth, Destroy, MaxHealthChanged,
    OnDamaged,
};
use crate::damage::DamageType;
use crate::regen::{ActionId, RegenRegistry, RegenScheduler, RegenTarget, TickReport};
use crate::resistance::{self, DamageResistance};
use crate::restoration::restore_raw;
use crate::time::{Expiration, GameClock, GameDuration, GameInstant};
use crate::vitality::VitalityRecord;
use parking_lot::RwLock;
use std::sync::Arc;
use void_ecs::{ComponentStore, Entity, EntityAllocator};
use void_event::{CollectorChain, EventBus, EventChannel};

/// Component storage shared with installed observers
pub type SharedStore<T> = Arc<RwLock<ComponentStore<T>>>;

/// Health, damage and regeneration state of a simulation
pub struct HealthWorld {
    pub(crate) config: HealthConfig,
    pub(crate) entities: EntityAllocator,
    pub(crate) vitality: ComponentStore<VitalityRecord>,
    pub(crate) resistances: SharedStore<DamageResistance>,
    pub(crate) base_regen: SharedStore<BaseRegen>,
    pub(crate) clock: GameClock,
    pub(crate) before_damaged: CollectorChain<BeforeDamaged>,
    pub(crate) before_restore: CollectorChain<BeforeRestore>,
    pub(crate) before_regen: CollectorChain<BeforeRegen>,
    pub(crate) max_health_chain: CollectorChain<ChangeMaxHealth>,
    pub(crate) events: EventBus,
    pub(crate) destroyed: EventChannel<Destroy>,
    pub(crate) scheduler: RegenScheduler,
}

impl HealthWorld {
    /// Create a world from a validated configuration
    pub fn new(config: HealthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: HealthConfig) -> Self {
        let mut world = Self {
            scheduler: RegenScheduler::new(config.regen_tick_interval_ms),
            config,
            entities: EntityAllocator::new(),
            vitality: ComponentStore::new(),
            resistances: Arc::new(RwLock::new(ComponentStore::new())),
            base_regen: Arc::new(RwLock::new(ComponentStore::new())),
            clock: GameClock::new(),
            before_damaged: CollectorChain::new(),
            before_restore: CollectorChain::new(),
            before_regen: CollectorChain::new(),
            max_health_chain: CollectorChain::new(),
            events: EventBus::new(),
            destroyed: EventChannel::new(),
        };
        resistance::install(&world.resistances, &mut world.before_damaged);
        base_regen::install(&world.base_regen, &mut world.before_regen, &mut world.events);
        world
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    // ===== Entities =====

    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Spawn an entity with a vitality record built from the configured defaults
    pub fn spawn_with_vitality(&mut self) -> Result<Entity> {
        let record = VitalityRecord::from_defaults(&self.config.vitality)?;
        let entity = self.entities.allocate();
        self.vitality.insert(entity, record);
        Ok(entity)
    }

    /// Despawn an entity and drop all of its health state
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        self.vitality.remove(entity);
        self.resistances.write().remove(entity);
        self.base_regen.write().remove(entity);
        self.scheduler.deregister_all(entity);
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    // ===== Components =====

    /// Attach a vitality record, returning the one it replaced
    pub fn insert_vitality(
        &mut self,
        entity: Entity,
        record: VitalityRecord,
    ) -> Result<Option<VitalityRecord>> {
        self.ensure_alive(entity)?;
        Ok(self.vitality.insert(entity, record))
    }

    /// Detach the vitality record. Active regeneration effects stay registered.
    pub fn remove_vitality(&mut self, entity: Entity) -> Option<VitalityRecord> {
        self.vitality.remove(entity)
    }

    pub fn vitality(&self, entity: Entity) -> Option<&VitalityRecord> {
        self.vitality.get(entity)
    }

    pub fn insert_resistance(&mut self, entity: Entity, resistance: DamageResistance) -> Result<()> {
        self.ensure_alive(entity)?;
        self.resistances.write().insert(entity, resistance);
        Ok(())
    }

    pub fn remove_resistance(&mut self, entity: Entity) -> Option<DamageResistance> {
        self.resistances.write().remove(entity)
    }

    /// Attach base regeneration and start its infinite regen effect
    pub fn enable_base_regen(&mut self, entity: Entity, regen: BaseRegen) -> Result<()> {
        self.ensure_alive(entity)?;
        self.base_regen.write().insert(entity, regen);
        self.register_regen(entity, ActionId::base_regen(), GameDuration::Infinite)?;
        Ok(())
    }

    /// Detach base regeneration and stop its effect
    pub fn disable_base_regen(&mut self, entity: Entity) -> Option<BaseRegen> {
        self.scheduler.deregister(entity, &ActionId::base_regen());
        self.base_regen.write().remove(entity)
    }

    pub fn base_regen(&self, entity: Entity) -> Option<BaseRegen> {
        self.base_regen.read().get(entity).copied()
    }

    // ===== Time =====

    pub fn now(&self) -> GameInstant {
        self.clock.now()
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut GameClock {
        &mut self.clock
    }

    // ===== Events =====

    /// Notification bus (`On*`, [`MaxHealthChanged`])
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn before_damaged(&self) -> &CollectorChain<BeforeDamaged> {
        &self.before_damaged
    }

    pub fn before_damaged_mut(&mut self) -> &mut CollectorChain<BeforeDamaged> {
        &mut self.before_damaged
    }

    pub fn before_restore(&self) -> &CollectorChain<BeforeRestore> {
        &self.before_restore
    }

    pub fn before_restore_mut(&mut self) -> &mut CollectorChain<BeforeRestore> {
        &mut self.before_restore
    }

    pub fn before_regen(&self) -> &CollectorChain<BeforeRegen> {
        &self.before_regen
    }

    pub fn before_regen_mut(&mut self) -> &mut CollectorChain<BeforeRegen> {
        &mut self.before_regen
    }

    pub fn change_max_health_chain(&self) -> &CollectorChain<ChangeMaxHealth> {
        &self.max_health_chain
    }

    pub fn change_max_health_chain_mut(&mut self) -> &mut CollectorChain<ChangeMaxHealth> {
        &mut self.max_health_chain
    }

    /// Pending despawn signals
    pub fn destroy_requests(&self) -> &EventChannel<Destroy> {
        &self.destroyed
    }

    /// Despawn every entity with a pending destroy signal
    pub fn drain_destroyed(&mut self) -> Vec<Destroy> {
        let signals = self.destroyed.drain();
        for signal in &signals {
            if self.despawn(signal.entity) {
                log::debug!("despawned {} after {:?} damage", signal.entity, signal.damage_type);
            }
        }
        signals
    }

    // ===== Max health =====

    /// Change max health through the `ChangeMaxHealth` chain.
    ///
    /// Current health above the new max is removed directly and reported as
    /// [`DamageType::MaxHealthReduction`] damage.
    pub fn change_max_health(&mut self, entity: Entity, new_max: i32) -> Result<()> {
        if new_max <= 0 {
            return Err(HealthError::NonPositiveMaxHealth(new_max));
        }
        self.checked_vitality(entity)?;

        let event = ChangeMaxHealth {
            entity,
            requested: new_max,
        };
        let Some(value) = self.max_health_chain.collect(&event, new_max as f32).result_value() else {
            log::debug!("max health change on {} consumed by a modifier", entity);
            return Ok(());
        };

        let now = self.clock.now();
        let record = self
            .vitality
            .get_mut(entity)
            .ok_or(HealthError::NoVitality(entity))?;
        let change = record.set_max(value.floor() as i32)?;
        log::debug!(
            "max health of {} changed {} -> {}",
            entity,
            change.old_max,
            change.new_max
        );

        if change.removed > 0 {
            self.events.send(&OnDamaged {
                entity,
                delta: change.removed,
                full_amount: change.removed,
                damage_type: DamageType::MaxHealthReduction,
                instigator: None,
                at: now,
            });
        }
        self.events.send(&MaxHealthChanged {
            entity,
            old_value: change.old_max,
            new_value: change.new_max,
        });
        Ok(())
    }

    // ===== Regeneration =====

    /// Start or extend a regeneration effect
    pub fn register_regen(
        &mut self,
        entity: Entity,
        id: ActionId,
        duration: GameDuration,
    ) -> Result<Expiration> {
        self.ensure_alive(entity)?;
        Ok(self.scheduler.register(entity, id, duration, self.clock.now()))
    }

    /// Stop a regeneration effect; false if it was not active
    pub fn deregister_regen(&mut self, entity: Entity, id: &ActionId) -> bool {
        self.scheduler.deregister(entity, id)
    }

    /// Stop every regeneration effect on an entity
    pub fn deregister_all_regen(&mut self, entity: Entity) -> bool {
        self.scheduler.deregister_all(entity)
    }

    pub fn regen_registry(&self, entity: Entity) -> Option<&RegenRegistry> {
        self.scheduler.registry(entity)
    }

    pub fn scheduler(&self) -> &RegenScheduler {
        &self.scheduler
    }

    /// Advance game time and run a regeneration tick when one is due
    pub fn update(&mut self, delta_ms: u64) -> Option<TickReport> {
        let now = self.clock.advance(delta_ms);
        let mut context = RegenContext {
            entities: &self.entities,
            vitality: &mut self.vitality,
            before_regen: &self.before_regen,
            events: &self.events,
        };
        self.scheduler.update(now, &mut context)
    }

    /// Run a regeneration tick at the current time, ignoring the cadence
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let mut context = RegenContext {
            entities: &self.entities,
            vitality: &mut self.vitality,
            before_regen: &self.before_regen,
            events: &self.events,
        };
        self.scheduler.tick(now, &mut context)
    }

    // ===== Helpers =====

    pub(crate) fn ensure_alive(&self, entity: Entity) -> Result<()> {
        if self.entities.is_alive(entity) {
            Ok(())
        } else {
            Err(HealthError::DeadEntity(entity))
        }
    }

    /// Live entity's vitality record, or the reason there is none
    pub(crate) fn checked_vitality(&self, entity: Entity) -> Result<&VitalityRecord> {
        self.ensure_alive(entity)?;
        self.vitality
            .get(entity)
            .ok_or(HealthError::NoVitality(entity))
    }
}

impl Default for HealthWorld {
    fn default() -> Self {
        Self::build(HealthConfig::default())
    }
}

/// Borrowed view of the world handed to the scheduler
struct RegenContext<'a> {
    entities: &'a EntityAllocator,
    vitality: &'a mut ComponentStore<VitalityRecord>,
    before_regen: &'a CollectorChain<BeforeRegen>,
    events: &'a EventBus,
}

impl RegenTarget for RegenContext<'_> {
    fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    fn has_vitality(&self, entity: Entity) -> bool {
        self.vitality.contains(entity)
    }

    fn contribution(&self, entity: Entity, id: &ActionId, now: GameInstant) -> Option<f32> {
        let event = BeforeRegen {
            entity,
            id: id.clone(),
            now,
        };
        self.before_regen.collect(&event, 0.0).result_value()
    }

    fn restore(&mut self, entity: Entity, amount: i32) -> i32 {
        self.vitality.get_mut(entity).map_or(0, |record| {
            restore_raw(record, entity, amount, Some(entity), self.events).delta
        })
    }
}
