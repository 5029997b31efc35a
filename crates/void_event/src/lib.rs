//! # void_event - Event System
//!
//! Synchronous event plumbing for simulation code:
//! - Typed notification bus with priority-based delivery
//! - Cancelable modifier chains ("collector events") where observers
//!   cooperatively add to, scale, or veto a proposed numeric outcome
//! - Single-type channels for deferred hand-off between systems
//!
//! Everything here runs on the caller's stack: `send` returns after every
//! handler has run, and a collector dispatch returns after the last observer
//! or the first one that consumed it.

use core::any::{Any, TypeId};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};

pub mod collector;

pub use collector::{CollectorChain, ModifiableValue, Modification};

/// Delivery priority. Higher priorities run first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Trivial = 0,
    Low = 1,
    #[default]
    Normal = 2,
    High = 3,
    Critical = 4,
}

/// Trait for events
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// Dynamic event handler
pub type DynamicHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub u64);

/// Stable insertion of `entry` into a list kept in descending priority order.
///
/// Entries with equal priority keep their registration order.
pub(crate) fn insert_by_priority<T>(list: &mut Vec<(SubscriberId, Priority, T)>, entry: (SubscriberId, Priority, T)) {
    let position = list.partition_point(|(_, priority, _)| *priority >= entry.1);
    list.insert(position, entry);
}

/// Notification bus: handlers subscribe per event type and are invoked
/// immediately, in priority order, when an event of that type is sent.
pub struct EventBus {
    handlers: BTreeMap<TypeId, Vec<(SubscriberId, Priority, DynamicHandler)>>,
    next_subscriber_id: u64,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            next_subscriber_id: 1,
        }
    }

    /// Deliver an event to every subscriber of its type
    pub fn send<E: Event>(&self, event: &E) {
        if let Some(handlers) = self.handlers.get(&TypeId::of::<E>()) {
            for (_, _, handler) in handlers {
                handler(event);
            }
        }
    }

    /// Subscribe to an event type
    pub fn subscribe<E: Event, F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority::<E, F>(handler, Priority::Normal)
    }

    /// Subscribe with priority
    pub fn subscribe_with_priority<E: Event, F>(
        &mut self,
        handler: F,
        priority: Priority,
    ) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let wrapped_handler: DynamicHandler = Box::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                handler(event);
            }
        });

        insert_by_priority(
            self.handlers.entry(TypeId::of::<E>()).or_default(),
            (id, priority, wrapped_handler),
        );

        id
    }

    /// Unsubscribe. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let mut removed = false;
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(sub_id, _, _)| *sub_id != id);
            removed |= handlers.len() != before;
        }
        removed
    }

    /// Number of handlers subscribed to `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel for single-type events
pub struct EventChannel<E: Event> {
    queue: Mutex<VecDeque<E>>,
}

impl<E: Event> EventChannel<E> {
    /// Create a new channel
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Send an event
    pub fn send(&self, event: E) {
        self.queue.lock().push_back(event);
    }

    /// Receive the oldest event
    pub fn receive(&self) -> Option<E> {
        self.queue.lock().pop_front()
    }

    /// Drain all events, oldest first
    pub fn drain(&self) -> Vec<E> {
        self.queue.lock().drain(..).collect()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Get pending count
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::collector::{CollectorChain, ModifiableValue, Modification};
    pub use crate::{Event, EventBus, EventChannel, Priority, SubscriberId};
}
