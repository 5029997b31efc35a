//! Sparse per-type component storage
//!
//! One [`ComponentStore`] holds every instance of a single component type,
//! keyed by entity. Iteration order is the entity order, which keeps systems
//! that walk a store deterministic between runs.

use crate::entity::{Entity, EntityAllocator};
use alloc::collections::BTreeMap;

/// Components of one type attached to entities
#[derive(Debug, Clone)]
pub struct ComponentStore<T> {
    components: BTreeMap<Entity, T>,
}

impl<T> ComponentStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Attach a component, returning the one it replaced
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.insert(entity, component)
    }

    /// Detach a component
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(&entity)
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Entities holding this component
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.components.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(e, c)| (*e, c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.components.iter_mut().map(|(e, c)| (*e, c))
    }

    /// Drop components whose entity is no longer alive. Returns how many were dropped.
    pub fn retain_alive(&mut self, entities: &EntityAllocator) -> usize {
        let before = self.components.len();
        self.components.retain(|entity, _| entities.is_alive(*entity));
        before - self.components.len()
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Armor(u32);

    #[test]
    fn test_insert_replace_remove() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        let mut store = ComponentStore::new();

        assert_eq!(store.insert(e, Armor(1)), None);
        assert_eq!(store.insert(e, Armor(2)), Some(Armor(1)));
        assert_eq!(store.get(e), Some(&Armor(2)));

        store.get_mut(e).unwrap().0 += 1;
        assert_eq!(store.remove(e), Some(Armor(3)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_retain_alive() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        let mut store = ComponentStore::new();
        store.insert(a, Armor(1));
        store.insert(b, Armor(2));

        alloc.deallocate(a);
        assert_eq!(store.retain_alive(&alloc), 1);
        assert_eq!(store.entities().collect::<Vec<_>>(), vec![b]);
    }
}
