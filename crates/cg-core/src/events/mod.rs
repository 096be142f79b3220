//! Typed publish/subscribe for grid and dashboard state changes

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::sort::SortDirection;

/// Marker for values that can travel over an [`EventBus`]
pub trait Event: fmt::Debug + Send + Sync + 'static {}

/// Any filter input changed; the page was reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiltersChanged {
    pub description: String,
}

/// The active sort changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortChanged {
    pub key: Option<String>,
    pub direction: Option<SortDirection>,
}

/// The visible page changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChanged {
    pub from: usize,
    pub to: usize,
}

/// The underlying record collection was swapped out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordsReplaced {
    pub count: usize,
}

macro_rules! impl_event {
    ($($t:ty),*) => {
        $(impl Event for $t {})*
    };
}

impl_event!(FiltersChanged, SortChanged, PageChanged, RecordsReplaced);

type Handler = Box<dyn FnMut(&dyn Any) + Send>;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    event: TypeId,
    seq: u64,
}

#[derive(Default)]
struct Registry {
    next_seq: u64,
    handlers: AHashMap<TypeId, Vec<(u64, Handler)>>,
}

/// Synchronous bus; clones share their subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every `E` published from now on
    pub fn subscribe<E: Event>(&self, mut handler: impl FnMut(&E) + Send + 'static) -> SubscriptionId {
        let event = TypeId::of::<E>();
        let erased: Handler = Box::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                handler(event);
            }
        });

        let mut registry = self.registry.lock();
        registry.next_seq += 1;
        let seq = registry.next_seq;
        registry.handlers.entry(event).or_default().push((seq, erased));
        SubscriptionId { event, seq }
    }

    /// Drop a handler; false when it was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock();
        let Some(handlers) = registry.handlers.get_mut(&id.event) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(seq, _)| *seq != id.seq);
        before != handlers.len()
    }

    /// Deliver `event` to its subscribers in subscription order.
    ///
    /// Handlers run on the caller's thread while the bus is locked, so a
    /// handler must not publish on the same bus.
    pub fn publish<E: Event>(&self, event: E) {
        tracing::trace!(?event, "publish");
        let mut registry = self.registry.lock();
        if let Some(handlers) = registry.handlers.get_mut(&TypeId::of::<E>()) {
            for (_, handler) in handlers.iter_mut() {
                handler(&event as &dyn Any);
            }
        }
    }

    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.registry
            .lock()
            .handlers
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("EventBus")
            .field("subscribers", &registry.handlers.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}
