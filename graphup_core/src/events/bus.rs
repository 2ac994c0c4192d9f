use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::event::{Event, EventChannel};
use super::observer::{EventObserver, FnObserver};

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscribers = HashMap<EventChannel, Vec<(SubscriptionId, Arc<dyn EventObserver>)>>;

/// Publish/subscribe hub keyed by `EventChannel`.
///
/// Delivery is synchronous: `emit` returns after every subscriber of the
/// event's channel has run, in subscription order. Nothing is guaranteed about
/// ordering across channels.
///
/// The subscriber list is snapshotted before delivery, so callbacks are free
/// to subscribe, unsubscribe or emit again without deadlocking. An event
/// emitted while another is being delivered (from a callback or another
/// thread) is queued behind it. The outermost `emit` delivers the queue before
/// it returns, which keeps every channel FIFO.
pub struct EventBus {
    subscribers: Mutex<Subscribers>,
    outbox: Mutex<Outbox>,
    next_id: AtomicU64,
}

#[derive(Default)]
struct Outbox {
    delivering: bool,
    pending: VecDeque<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            outbox: Mutex::new(Outbox::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        // Subscribers never run under the lock, so poisoning can't leave the
        // map half-updated.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a closure on one channel.
    pub fn subscribe<F>(&self, channel: EventChannel, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribe_observer(channel, Arc::new(FnObserver(callback)))
    }

    /// Register a shared observer on one channel. The same observer may be
    /// registered on several channels.
    pub fn subscribe_observer(
        &self,
        channel: EventChannel,
        observer: Arc<dyn EventObserver>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().entry(channel).or_default().push((id, observer));
        log::debug!("[event_bus] subscribed {:?} to {}", id, channel);
        id
    }

    /// Returns `false` if the id was unknown (already removed).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        for list in subscribers.values_mut() {
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self, channel: EventChannel) -> usize {
        self.lock().get(&channel).map_or(0, Vec::len)
    }

    fn outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Deliver `event` to every subscriber of its channel.
    ///
    /// Re-entrant calls from a subscriber only enqueue; the call that started
    /// delivery drains the queue in emission order.
    pub fn emit(&self, event: &Event) {
        {
            let mut outbox = self.outbox();
            outbox.pending.push_back(event.clone());
            if outbox.delivering {
                return;
            }
            outbox.delivering = true;
        }

        loop {
            let next = {
                let mut outbox = self.outbox();
                match outbox.pending.pop_front() {
                    Some(next) => next,
                    None => {
                        outbox.delivering = false;
                        return;
                    }
                }
            };
            self.deliver(&next);
        }
    }

    fn deliver(&self, event: &Event) {
        let channel = event.channel();
        let targets: Vec<Arc<dyn EventObserver>> = match self.lock().get(&channel) {
            Some(list) => list.iter().map(|(_, obs)| Arc::clone(obs)).collect(),
            None => return,
        };

        for observer in targets {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.on_event(event)));
            if delivered.is_err() {
                log::error!(
                    "[event_bus] subscriber on {} panicked; continuing delivery",
                    channel
                );
            }
        }
    }
}
