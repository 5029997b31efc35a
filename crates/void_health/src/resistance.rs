//! Percentage damage resistances

use crate::damage::DamageType;
use crate::events::BeforeDamaged;
use crate::world::SharedStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use void_event::{CollectorChain, Modification};

/// Percent of incoming damage an entity shrugs off, per damage type
///
/// A blanket `all` value takes precedence over per-type entries. Values
/// above 100 turn damage into healing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageResistance {
    pub all: Option<f32>,
    pub per_type: HashMap<DamageType, f32>,
}

impl DamageResistance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resist every damage type by `percent`
    pub fn with_all(mut self, percent: f32) -> Self {
        self.all = Some(percent);
        self
    }

    /// Resist one damage type by `percent`
    pub fn with_resistance(mut self, damage_type: DamageType, percent: f32) -> Self {
        self.per_type.insert(damage_type, percent);
        self
    }

    /// Percent resisted for a damage type, if any
    pub fn percent(&self, damage_type: DamageType) -> Option<f32> {
        if !damage_type.is_resistible() {
            return None;
        }
        self.all.or_else(|| self.per_type.get(&damage_type).copied())
    }

    /// Factor applied to incoming damage of this type
    pub fn multiplier(&self, damage_type: DamageType) -> f32 {
        self.percent(damage_type)
            .map_or(1.0, |percent| (100.0 - percent) / 100.0)
    }
}

/// Hook resistances into the damage chain
pub(crate) fn install(store: &SharedStore<DamageResistance>, chain: &mut CollectorChain<BeforeDamaged>) {
    let store = store.clone();
    chain.subscribe(move |event: &BeforeDamaged| {
        store
            .read()
            .get(event.entity)
            .and_then(|resistance| resistance.percent(event.damage_type))
            .map_or(Modification::PASS, |percent| {
                Modification::multiply((100.0 - percent) / 100.0)
            })
    });
}
