//! Game-time values
//!
//! All scheduling runs on game time in whole milliseconds. Open-ended
//! regeneration effects use [`GameDuration::Infinite`] and
//! [`Expiration::Never`] rather than magic negative timestamps.

use serde::{Deserialize, Serialize};

/// A point in game time, in milliseconds since the simulation started
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameInstant(u64);

impl GameInstant {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Negative or non-finite inputs clamp to [`GameInstant::ZERO`]
    pub fn from_secs_f32(secs: f32) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self((secs * 1000.0).round() as u64)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_secs_f32(&self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub const fn millis_since(&self, earlier: GameInstant) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub const fn plus_millis(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

/// A span of game time, or an open-ended one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameDuration {
    Finite(u64),
    Infinite,
}

impl GameDuration {
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self::Finite(millis)
    }

    /// Negative seconds denote an infinite duration
    pub fn from_secs_f32(secs: f32) -> Self {
        if secs < 0.0 || secs.is_infinite() {
            Self::Infinite
        } else if secs.is_nan() {
            Self::Finite(0)
        } else {
            Self::Finite((secs * 1000.0).round() as u64)
        }
    }

    #[inline]
    pub const fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Milliseconds, or `None` when infinite
    pub const fn as_millis(&self) -> Option<u64> {
        match self {
            Self::Finite(ms) => Some(*ms),
            Self::Infinite => None,
        }
    }

    pub fn max(self, other: Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.max(b)),
            _ => Self::Infinite,
        }
    }

    pub fn min(self, other: Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.min(b)),
            (Self::Infinite, finite) | (finite, Self::Infinite) => finite,
        }
    }
}

/// When a timed effect ends
///
/// Ordered so that `Never` is later than every instant; `max` therefore
/// keeps whichever expiration lasts longer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Expiration {
    At(GameInstant),
    Never,
}

impl Expiration {
    /// Expiration `duration` after `now`
    pub fn after(now: GameInstant, duration: GameDuration) -> Self {
        match duration {
            GameDuration::Finite(ms) => Self::At(now.plus_millis(ms)),
            GameDuration::Infinite => Self::Never,
        }
    }

    #[inline]
    pub const fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }

    /// True once `now` reached the expiration instant. Never true for `Never`.
    pub fn has_passed(&self, now: GameInstant) -> bool {
        match self {
            Self::At(instant) => *instant <= now,
            Self::Never => false,
        }
    }
}

/// Monotonic game clock owned by the simulation context
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    now: GameInstant,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at a given instant
    pub fn starting_at(now: GameInstant) -> Self {
        Self { now }
    }

    #[inline]
    pub fn now(&self) -> GameInstant {
        self.now
    }

    /// Advance by `delta_ms` and return the new time
    pub fn advance(&mut self, delta_ms: u64) -> GameInstant {
        self.now = self.now.plus_millis(delta_ms);
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_secs() {
        assert_eq!(GameDuration::from_secs_f32(1.5), GameDuration::Finite(1500));
        assert_eq!(GameDuration::from_secs_f32(-1.0), GameDuration::Infinite);
        assert_eq!(GameDuration::from_secs_f32(f32::INFINITY), GameDuration::Infinite);
        assert_eq!(GameDuration::from_secs_f32(0.2).as_millis(), Some(200));
    }

    #[test]
    fn test_duration_min_max() {
        let short = GameDuration::from_millis(100);
        let long = GameDuration::from_millis(900);
        assert_eq!(short.max(long), long);
        assert_eq!(short.min(long), short);
        assert_eq!(short.max(GameDuration::Infinite), GameDuration::Infinite);
        assert_eq!(GameDuration::Infinite.min(long), long);
    }

    #[test]
    fn test_expiration_ordering() {
        let now = GameInstant::from_millis(1_000);
        let soon = Expiration::after(now, GameDuration::from_millis(500));
        let later = Expiration::after(now, GameDuration::from_millis(2_000));
        let never = Expiration::after(now, GameDuration::Infinite);

        assert_eq!(soon, Expiration::At(GameInstant::from_millis(1_500)));
        assert_eq!(soon.max(later), later);
        assert_eq!(later.max(never), never);
        assert_eq!(never.min(soon), soon);
    }

    #[test]
    fn test_expiration_has_passed() {
        let at = Expiration::At(GameInstant::from_millis(500));
        assert!(!at.has_passed(GameInstant::from_millis(499)));
        assert!(at.has_passed(GameInstant::from_millis(500)));
        assert!(!Expiration::Never.has_passed(GameInstant::from_millis(u64::MAX)));
    }

    #[test]
    fn test_clock() {
        let mut clock = GameClock::new();
        assert_eq!(clock.now(), GameInstant::ZERO);
        clock.advance(200);
        let now = clock.advance(300);
        assert_eq!(now.as_millis(), 500);
        assert_eq!(now.millis_since(GameInstant::from_millis(200)), 300);
        assert_eq!(GameInstant::ZERO.millis_since(now), 0);
    }
}
