//! Regeneration scheduler
//!
//! Entities hold a [`RegenRegistry`] while at least one named regeneration
//! effect is active on them. On a fixed game-time cadence the scheduler asks
//! a [`RegenTarget`] for each effect's rate, accrues `rate × elapsed` plus the
//! carried fractional remainder, restores the whole part and expires effects
//! whose time is up.
//!
//! The scheduler owns its own next-tick instant; nothing here is global.

use crate::error::Result;
use crate::time::{Expiration, GameDuration, GameInstant};
use std::collections::BTreeMap;
use std::fmt;
use void_core::NamedId;
use void_ecs::Entity;

/// Name of the built-in base regeneration effect
pub const BASE_REGEN_ID: &str = "health:baseRegen";

/// Identifier of one regeneration effect on an entity
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(NamedId);

impl ActionId {
    /// Validate and create an action id
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self(NamedId::new(name)?))
    }

    /// Id of the built-in base regeneration effect
    pub fn base_regen() -> Self {
        Self(NamedId::from_static(BASE_REGEN_ID))
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl fmt::Debug for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionId({:?})", self.0.name())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<&str> for ActionId {
    type Error = crate::error::HealthError;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

/// Active regeneration effects of one entity
#[derive(Debug, Clone)]
pub struct RegenRegistry {
    actions: BTreeMap<ActionId, Expiration>,
    remainder: f32,
    last_tick: GameInstant,
}

impl RegenRegistry {
    fn new(now: GameInstant) -> Self {
        Self {
            actions: BTreeMap::new(),
            remainder: 0.0,
            last_tick: now,
        }
    }

    /// Insert an effect or extend its expiration; never shortens it
    fn upsert(&mut self, id: ActionId, expiration: Expiration) -> Expiration {
        let entry = self.actions.entry(id).or_insert(expiration);
        *entry = (*entry).max(expiration);
        *entry
    }

    /// Expiration of an effect, if registered
    pub fn expiration(&self, id: &ActionId) -> Option<Expiration> {
        self.actions.get(id).copied()
    }

    pub fn contains(&self, id: &ActionId) -> bool {
        self.actions.contains_key(id)
    }

    /// Registered effect ids in deterministic order
    pub fn ids(&self) -> impl Iterator<Item = &ActionId> {
        self.actions.keys()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Fractional regeneration carried to the next tick
    pub fn remainder(&self) -> f32 {
        self.remainder
    }

    pub fn last_tick(&self) -> GameInstant {
        self.last_tick
    }

    /// Add `rate × elapsed` to the remainder and split off the whole part.
    ///
    /// A non-finite total clears the remainder and applies nothing.
    fn accrue(&mut self, rate: f32, elapsed_secs: f32) -> i32 {
        let raw = rate * elapsed_secs + self.remainder;
        if !raw.is_finite() {
            self.remainder = 0.0;
            return 0;
        }
        let applied = raw.floor();
        self.remainder = raw - applied;
        applied as i32
    }

    /// Drop effects whose expiration has passed; returns how many
    fn expire(&mut self, now: GameInstant) -> usize {
        let before = self.actions.len();
        self.actions.retain(|_, expiration| !expiration.has_passed(now));
        before - self.actions.len()
    }
}

/// The world the scheduler reads rates from and writes health into
pub trait RegenTarget {
    /// Whether the handle still refers to a live entity
    fn is_alive(&self, entity: Entity) -> bool;

    /// Whether the entity currently has a vitality record
    fn has_vitality(&self, entity: Entity) -> bool;

    /// Rate in health per second contributed for `id`, or `None` if an
    /// observer consumed the request
    fn contribution(&self, entity: Entity, id: &ActionId, now: GameInstant) -> Option<f32>;

    /// Apply regenerated health, bypassing restoration modifiers.
    /// Returns the health actually added.
    fn restore(&mut self, entity: Entity, amount: i32) -> i32;
}

/// Summary of one scheduler tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Registries that accrued regeneration
    pub processed: usize,
    /// Registries skipped because their entity has no vitality record
    pub skipped: usize,
    /// Registries dropped because they emptied or their entity died
    pub dropped: usize,
    /// Total health restored
    pub restored: i32,
}

/// Owns every entity's regen registry and the tick cadence
#[derive(Debug, Clone)]
pub struct RegenScheduler {
    registries: BTreeMap<Entity, RegenRegistry>,
    interval_ms: u64,
    next_tick: GameInstant,
}

impl RegenScheduler {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            registries: BTreeMap::new(),
            interval_ms: interval_ms.max(1),
            next_tick: GameInstant::ZERO,
        }
    }

    /// Register or extend the effect `id` on `entity`, lasting `duration` from `now`
    pub fn register(
        &mut self,
        entity: Entity,
        id: ActionId,
        duration: GameDuration,
        now: GameInstant,
    ) -> Expiration {
        let registry = self.registries.entry(entity).or_insert_with(|| {
            log::debug!("creating regen registry for {}", entity);
            RegenRegistry::new(now)
        });
        log::debug!("registering regen {} on {} for {:?}", id, entity, duration);
        registry.upsert(id, Expiration::after(now, duration))
    }

    /// Remove the effect `id`; returns false if it was not registered
    pub fn deregister(&mut self, entity: Entity, id: &ActionId) -> bool {
        let Some(registry) = self.registries.get_mut(&entity) else {
            return false;
        };
        if registry.actions.remove(id).is_none() {
            return false;
        }
        log::debug!("deregistered regen {} on {}", id, entity);
        if registry.is_empty() {
            self.registries.remove(&entity);
            log::debug!("dropped empty regen registry for {}", entity);
        }
        true
    }

    /// Remove every effect on `entity`; returns false if none were registered
    pub fn deregister_all(&mut self, entity: Entity) -> bool {
        let removed = self.registries.remove(&entity).is_some();
        if removed {
            log::debug!("dropped all regen on {}", entity);
        }
        removed
    }

    pub fn registry(&self, entity: Entity) -> Option<&RegenRegistry> {
        self.registries.get(&entity)
    }

    pub fn is_active(&self, entity: Entity, id: &ActionId) -> bool {
        self.registries
            .get(&entity)
            .is_some_and(|registry| registry.contains(id))
    }

    /// Number of entities with at least one active effect
    pub fn active_count(&self) -> usize {
        self.registries.len()
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn next_tick(&self) -> GameInstant {
        self.next_tick
    }

    /// Run a tick if the cadence has elapsed at `now`
    pub fn update<T: RegenTarget>(&mut self, now: GameInstant, target: &mut T) -> Option<TickReport> {
        if now < self.next_tick {
            return None;
        }
        self.next_tick = now.plus_millis(self.interval_ms);
        Some(self.tick(now, target))
    }

    /// Accrue and apply regeneration for every registry, then expire effects
    pub fn tick<T: RegenTarget>(&mut self, now: GameInstant, target: &mut T) -> TickReport {
        let mut report = TickReport::default();

        self.registries.retain(|&entity, registry| {
            if !target.is_alive(entity) {
                log::warn!("dropping regen registry of dead entity {}", entity);
                report.dropped += 1;
                return false;
            }

            let elapsed_secs = now.millis_since(registry.last_tick) as f32 / 1000.0;
            registry.last_tick = now;

            if target.has_vitality(entity) {
                let rate: f32 = registry
                    .actions
                    .keys()
                    .map(|id| match target.contribution(entity, id, now) {
                        Some(rate) if rate.is_finite() => rate.max(0.0),
                        Some(rate) => {
                            log::warn!(
                                "ignoring non-finite regen rate {} for {} on {}",
                                rate,
                                id,
                                entity
                            );
                            0.0
                        }
                        None => 0.0,
                    })
                    .sum();
                let amount = registry.accrue(rate, elapsed_secs);
                log::trace!(
                    "regen tick for {}: rate {:.3}/s over {:.3}s, applying {}",
                    entity,
                    rate,
                    elapsed_secs,
                    amount
                );
                if amount > 0 {
                    let applied = target.restore(entity, amount);
                    report.restored = report.restored.saturating_add(applied);
                }
                report.processed += 1;
            } else {
                log::warn!("{} has regen effects but no vitality record, skipping", entity);
                report.skipped += 1;
            }

            registry.expire(now);
            if registry.is_empty() {
                log::debug!("regen registry for {} expired", entity);
                report.dropped += 1;
                return false;
            }
            true
        });

        report
    }
}

impl Default for RegenScheduler {
    fn default() -> Self {
        Self::new(200)
    }
}
