use crate::core::values::events::{EventFilter, FrameEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};

/// Handle returned by every subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub type EventCallback = Arc<dyn Fn(&FrameEvent) + Send + Sync>;

#[derive(Clone)]
enum Delivery {
    Callback(EventCallback),
    Channel(mpsc::Sender<FrameEvent>),
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    delivery: Delivery,
}

/// Registered observers of `received` / `sent` events
///
/// Channel subscribers are fed while the list is locked, so every channel
/// sees events in emission order. Callbacks run after the lock is dropped
/// and may subscribe or unsubscribe from inside the callback.
pub struct EventObservers {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl EventObservers {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, filter: EventFilter, delivery: Delivery) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                id,
                filter,
                delivery,
            });
        id
    }

    /// Register a callback for events matching `filter`
    pub fn subscribe<F>(&self, filter: EventFilter, callback: F) -> SubscriptionId
    where
        F: Fn(&FrameEvent) + Send + Sync + 'static,
    {
        self.add(filter, Delivery::Callback(Arc::new(callback)))
    }

    /// Register a channel for events matching `filter`
    ///
    /// Dropping the receiver ends the subscription on the next emit.
    pub fn subscribe_channel(&self, filter: EventFilter) -> (SubscriptionId, mpsc::Receiver<FrameEvent>) {
        let (tx, rx) = mpsc::channel();
        let id = self.add(filter, Delivery::Channel(tx));
        (id, rx)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|sub| sub.id != id);
        subscribers.len() != before
    }

    /// Deliver an event to every matching subscriber
    pub fn emit(&self, event: &FrameEvent) {
        let callbacks: Vec<EventCallback> = {
            let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
            subscribers.retain(|sub| match &sub.delivery {
                Delivery::Channel(tx) if sub.filter.matches(&event.kind) => tx.send(event.clone()).is_ok(),
                _ => true,
            });
            subscribers
                .iter()
                .filter(|sub| sub.filter.matches(&event.kind))
                .filter_map(|sub| match &sub.delivery {
                    Delivery::Callback(callback) => Some(Arc::clone(callback)),
                    Delivery::Channel(_) => None,
                })
                .collect()
        };

        for callback in callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventObservers {
    fn default() -> Self {
        Self::new()
    }
}
