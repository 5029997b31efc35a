//! Built-in, cool-down gated base regeneration
//!
//! An entity with a [`BaseRegen`] component regenerates `regen_rate` health
//! per second under the [`BASE_REGEN_ID`](crate::regen::BASE_REGEN_ID) effect,
//! except within `wait_before_regen` seconds of its last hit.

use crate::events::{BeforeRegen, OnDamaged};
use crate::regen::ActionId;
use crate::time::GameInstant;
use crate::world::SharedStore;
use serde::{Deserialize, Serialize};
use void_event::{CollectorChain, EventBus, Modification, Priority};

/// Base regeneration settings of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRegen {
    /// Health restored per second of game time
    pub regen_rate: f32,
    /// Cool-down after taking damage, in seconds
    pub wait_before_regen: f32,
    /// When the entity was last damaged
    #[serde(default)]
    pub last_hit: Option<GameInstant>,
}

impl BaseRegen {
    pub fn new(regen_rate: f32, wait_before_regen: f32) -> Self {
        Self {
            regen_rate,
            wait_before_regen,
            last_hit: None,
        }
    }

    /// Whether regeneration is still held back by the last hit at `now`
    pub fn is_cooling_down(&self, now: GameInstant) -> bool {
        let wait_ms = (self.wait_before_regen.max(0.0) * 1000.0) as u64;
        self.last_hit
            .is_some_and(|hit| now < hit.plus_millis(wait_ms))
    }
}

/// Hook base regeneration into the regen chain and the notification bus
pub(crate) fn install(
    store: &SharedStore<BaseRegen>,
    chain: &mut CollectorChain<BeforeRegen>,
    events: &mut EventBus,
) {
    let base_id = ActionId::base_regen();

    let cooldown = store.clone();
    let id = base_id.clone();
    chain.subscribe_with_priority(
        move |event: &BeforeRegen| {
            let cooling = event.id == id
                && cooldown
                    .read()
                    .get(event.entity)
                    .is_some_and(|regen| regen.is_cooling_down(event.now));
            if cooling {
                Modification::consume()
            } else {
                Modification::PASS
            }
        },
        Priority::High,
    );

    let rates = store.clone();
    chain.subscribe(move |event: &BeforeRegen| {
        if event.id != base_id {
            return Modification::PASS;
        }
        rates
            .read()
            .get(event.entity)
            .map_or(Modification::PASS, |regen| Modification::add(regen.regen_rate))
    });

    let hits = store.clone();
    events.subscribe(move |event: &OnDamaged| {
        if let Some(regen) = hits.write().get_mut(event.entity) {
            regen.last_hit = Some(event.at);
        }
    });
}
