//! Cancelable modifier chains
//!
//! A collector dispatch proposes a numeric outcome and lets a prioritized list
//! of observers shape it. Each observer returns a [`Modification`]: either an
//! additive/multiplicative contribution or [`Modification::Consumed`], which
//! stops the dispatch on the spot and voids the outcome.
//!
//! Without cancellation the result is `(base + Σ adds) × Π multipliers`,
//! independent of the order in which the contributions arrived.

use crate::{insert_by_priority, Event, Priority, SubscriberId};

/// What one observer contributes to a collector dispatch
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Modification {
    /// Keep going, adding `add` to the sum and `multiply` to the product
    Continue { add: f32, multiply: f32 },
    /// Cancel the dispatch; later observers do not run
    Consumed,
}

impl Modification {
    /// Contribute nothing
    pub const PASS: Self = Self::Continue {
        add: 0.0,
        multiply: 1.0,
    };

    /// Contribute an additive term
    #[inline]
    pub const fn add(amount: f32) -> Self {
        Self::Continue {
            add: amount,
            multiply: 1.0,
        }
    }

    /// Contribute a multiplicative factor
    #[inline]
    pub const fn multiply(factor: f32) -> Self {
        Self::Continue {
            add: 0.0,
            multiply: factor,
        }
    }

    /// Cancel the dispatch
    #[inline]
    pub const fn consume() -> Self {
        Self::Consumed
    }

    /// Add a multiplicative factor to this contribution
    pub fn and_multiply(self, factor: f32) -> Self {
        match self {
            Self::Continue { add, multiply } => Self::Continue {
                add,
                multiply: multiply * factor,
            },
            Self::Consumed => Self::Consumed,
        }
    }

    /// Add an additive term to this contribution
    pub fn and_add(self, amount: f32) -> Self {
        match self {
            Self::Continue { add, multiply } => Self::Continue {
                add: add + amount,
                multiply,
            },
            Self::Consumed => Self::Consumed,
        }
    }
}

impl Default for Modification {
    fn default() -> Self {
        Self::PASS
    }
}

/// Outcome of one collector dispatch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModifiableValue {
    base: f32,
    adds: f32,
    multiplier: f32,
    consumed: bool,
}

impl ModifiableValue {
    /// Start a dispatch at `base`
    pub fn new(base: f32) -> Self {
        Self {
            base,
            adds: 0.0,
            multiplier: 1.0,
            consumed: false,
        }
    }

    /// Fold one contribution in. Returns `false` once the value is consumed.
    pub fn apply(&mut self, modification: Modification) -> bool {
        if self.consumed {
            return false;
        }
        match modification {
            Modification::Continue { add, multiply } => {
                self.adds += add;
                self.multiplier *= multiply;
                true
            }
            Modification::Consumed => {
                self.consumed = true;
                false
            }
        }
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    /// Sum of all additive contributions
    pub fn adds(&self) -> f32 {
        self.adds
    }

    /// Product of all multiplicative contributions
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// `(base + adds) × multiplier`, or `None` if an observer consumed the dispatch.
    ///
    /// A consumed value is void, not zero.
    pub fn result_value(&self) -> Option<f32> {
        if self.consumed {
            None
        } else {
            Some((self.base + self.adds) * self.multiplier)
        }
    }
}

/// Observer callback for collector events of type `E`
pub type Observer<E> = Box<dyn Fn(&E) -> Modification + Send + Sync>;

/// Ordered list of observers for one collector event type
///
/// Observers run in descending [`Priority`]; ties run in registration order.
pub struct CollectorChain<E: Event> {
    observers: Vec<(SubscriberId, Priority, Observer<E>)>,
    next_subscriber_id: u64,
}

impl<E: Event> CollectorChain<E> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_subscriber_id: 1,
        }
    }

    /// Register an observer at [`Priority::Normal`]
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberId
    where
        F: Fn(&E) -> Modification + Send + Sync + 'static,
    {
        self.subscribe_with_priority(observer, Priority::Normal)
    }

    /// Register an observer at the given priority
    pub fn subscribe_with_priority<F>(&mut self, observer: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) -> Modification + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;
        insert_by_priority(&mut self.observers, (id, priority, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub_id, _, _)| *sub_id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Run every observer against `event`, starting from `base`.
    ///
    /// Stops at the first observer that consumes the dispatch.
    pub fn collect(&self, event: &E, base: f32) -> ModifiableValue {
        let mut value = ModifiableValue::new(base);
        for (id, priority, observer) in &self.observers {
            if !value.apply(observer(event)) {
                log::trace!(
                    "{} consumed by subscriber {:?} ({:?})",
                    core::any::type_name::<E>(),
                    id,
                    priority
                );
                break;
            }
        }
        value
    }
}

impl<E: Event> Default for CollectorChain<E> {
    fn default() -> Self {
        Self::new()
    }
}
