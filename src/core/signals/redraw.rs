use super::observers::SubscriptionId;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub type RedrawCallback = Arc<dyn Fn() + Send + Sync>;

/// Edge-triggered "visible state changed" notification
///
/// `raise` marks the signal pending and wakes subscribers only on the
/// transition from idle to pending. Further raises before `acknowledge` are
/// folded into the pending one, so a presentation layer that re-reads the
/// node state after acknowledging never misses a change.
pub struct RedrawSignal {
    pending: AtomicBool,
    generation: AtomicU64,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, RedrawCallback)>>,
}

impl RedrawSignal {
    pub fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Mark visible state as stale
    pub fn raise(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }

        let subscribers: Vec<RedrawCallback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in subscribers {
            callback();
        }
    }

    /// Clear the pending flag, returns whether a redraw was pending
    pub fn acknowledge(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Number of raises since creation, coalesced or not
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }
}

impl Default for RedrawSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_raises_coalesce_until_acknowledged() {
        let signal = RedrawSignal::new();
        let wakeups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakeups);
        signal.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        signal.raise();
        signal.raise();
        signal.raise();
        assert_eq!(wakeups.load(Ordering::SeqCst), 1);
        assert_eq!(signal.generation(), 3);

        assert!(signal.acknowledge());
        assert!(!signal.acknowledge());

        signal.raise();
        assert_eq!(wakeups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let signal = RedrawSignal::new();
        let wakeups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakeups);
        let id = signal.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        signal.raise();
        assert_eq!(wakeups.load(Ordering::SeqCst), 0);
        assert!(signal.is_pending());
    }
}
