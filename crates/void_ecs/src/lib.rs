//! # void_ecs - Entities and component storage
//!
//! The slice of the entity/component store that gameplay systems depend on:
//! - Generational entity handles with explicit liveness queries
//! - Sparse, deterministic per-type component storage
//!
//! ## Example
//!
//! ```
//! use void_ecs::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Shield(u32);
//!
//! let mut entities = EntityAllocator::new();
//! let mut shields = ComponentStore::new();
//!
//! let e = entities.allocate();
//! shields.insert(e, Shield(3));
//! assert_eq!(shields.get(e), Some(&Shield(3)));
//!
//! entities.deallocate(e);
//! assert!(!entities.is_alive(e));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod entity;
pub mod storage;

pub use entity::{Entity, EntityAllocator};
pub use storage::ComponentStore;

/// Prelude
pub mod prelude {
    pub use crate::entity::{Entity, EntityAllocator};
    pub use crate::storage::ComponentStore;
}
