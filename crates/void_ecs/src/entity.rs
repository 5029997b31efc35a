//! Entity - Opaque handles for simulation objects
//!
//! Handles never own the object they refer to. Whether a handle still names
//! a live entity is answered by the [`EntityAllocator`] that issued it: every
//! despawn bumps the slot generation, so stale handles stop matching.

use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Entity handle with generation for ABA protection
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Sentinel for "no entity" (e.g. an environmental instigator)
    pub const NULL: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Create a handle from raw parts
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation at the time the handle was issued
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Check if this is the null handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.index == u32::MAX
    }

    /// Pack into a single `u64` (generation in the upper half)
    #[inline]
    pub const fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Unpack from [`Entity::to_bits`]
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index, self.generation)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index, self.generation)
        }
    }
}

/// Issues entity handles and answers liveness queries
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Current generation per slot
    generations: Vec<u32>,
    /// Whether the slot is currently occupied
    occupied: Vec<bool>,
    /// Released slots available for reuse
    free_list: Vec<u32>,
    alive_count: usize,
}

impl EntityAllocator {
    /// Create an empty allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh handle, reusing a released slot when possible
    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            self.occupied[slot] = true;
            Entity::new(index, self.generations[slot])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.occupied.push(true);
            Entity::new(index, 0)
        }
    }

    /// Release a handle. Returns `false` if it was already stale.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let slot = entity.index as usize;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.occupied[slot] = false;
        self.free_list.push(entity.index);
        self.alive_count -= 1;
        true
    }

    /// Does this handle still refer to a live entity?
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let slot = entity.index as usize;
        self.occupied.get(slot).copied().unwrap_or(false)
            && self.generations[slot] == entity.generation
    }

    /// Number of live entities
    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Iterate over every live handle
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.generations
            .iter()
            .zip(self.occupied.iter())
            .enumerate()
            .filter(|(_, (_, occupied))| **occupied)
            .map(|(index, (generation, _))| Entity::new(index as u32, *generation))
    }
}
