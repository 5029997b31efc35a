//! # void_core - Void Engine Core
//!
//! Zero-dependency primitives shared by the rest of the workspace:
//! - **Named identifiers**: validated, cheaply clonable names with a
//!   precomputed hash, used for regeneration action ids and similar keys
//! - **Errors**: the core error type and result alias

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

pub mod error;
pub mod id;

pub use error::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, NameError, Result};
    pub use crate::id::NamedId;
}
