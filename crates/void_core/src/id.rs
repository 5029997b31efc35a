//! Validated named identifiers
//!
//! A [`NamedId`] is the stable key for things that are addressed by name
//! across systems (regeneration actions, damage categories, ...). The name is
//! validated once on construction and shared behind an `Arc`, so clones are
//! cheap and comparisons short-circuit on the precomputed hash.

use crate::error::NameError;
use alloc::string::String;
use alloc::sync::Arc;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Longest accepted name, in bytes
pub const MAX_NAME_LEN: usize = 128;

/// FNV-1a over the name bytes
const fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x100000001b3);
        i += 1;
    }
    hash
}

/// A validated, string-based identifier for named resources
///
/// Accepted names are non-empty, at most [`MAX_NAME_LEN`] bytes and made of
/// ASCII alphanumerics plus `_`, `.`, `-` and the `:` namespace separator
/// (e.g. `health:baseRegen`).
#[derive(Clone)]
pub struct NamedId {
    name: Arc<str>,
    hash: u64,
}

impl NamedId {
    /// Validate and create a named ID
    pub fn new(name: &str) -> Result<Self, NameError> {
        Self::validate(name)?;
        Ok(Self {
            name: Arc::from(name),
            hash: fnv1a(name.as_bytes()),
        })
    }

    /// Create an ID from a name known at compile time.
    ///
    /// The name is only validated in debug builds.
    #[track_caller]
    pub fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::validate(name).is_ok(), "invalid static name {name:?}");
        Self {
            name: Arc::from(name),
            hash: fnv1a(name.as_bytes()),
        }
    }

    /// Check a candidate name without allocating
    pub fn validate(name: &str) -> Result<(), NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong {
                len: name.len(),
                max: MAX_NAME_LEN,
            });
        }
        if let Some((position, ch)) = name
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ':')))
        {
            return Err(NameError::InvalidChar { ch, position });
        }
        if name.starts_with(':') || name.ends_with(':') {
            return Err(NameError::DanglingSeparator);
        }
        Ok(())
    }

    /// Get the name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace part of a `namespace:name` identifier, if any
    pub fn namespace(&self) -> Option<&str> {
        self.name.split_once(':').map(|(ns, _)| ns)
    }

    /// Get the precomputed hash
    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for NamedId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && (Arc::ptr_eq(&self.name, &other.name) || self.name == other.name)
    }
}

impl Eq for NamedId {}

impl Hash for NamedId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl PartialOrd for NamedId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NamedId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Debug for NamedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamedId({:?})", self.name)
    }
}

impl fmt::Display for NamedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TryFrom<&str> for NamedId {
    type Error = NameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<String> for NamedId {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}
