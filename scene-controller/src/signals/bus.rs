use super::{Signal, SignalKind};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Subscriber {
    kinds: Vec<SignalKind>,
    mailbox: VecDeque<Signal>,
}

#[derive(Debug, Default)]
struct BusInner {
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_id: u64,
}

/// Cloneable handle to a main-thread signal bus.
///
/// Publishing copies the signal into the mailbox of every subscriber
/// registered for its kind; subscribers drain their mailbox when they run.
/// Signals published before a subscription exists are not replayed.
#[derive(Debug, Clone, Default)]
pub struct SignalBus {
    inner: Rc<RefCell<BusInner>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kinds: &[SignalKind]) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.insert(
            id,
            Subscriber {
                kinds: kinds.to_vec(),
                mailbox: VecDeque::new(),
            },
        );
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().subscribers.remove(&id).is_some()
    }

    /// Deliver `signal`; returns the number of subscribers it reached.
    pub fn publish(&self, signal: Signal) -> usize {
        let kind = signal.kind();
        let mut delivered = 0;
        for subscriber in self.inner.borrow_mut().subscribers.values_mut() {
            if subscriber.kinds.contains(&kind) {
                subscriber.mailbox.push_back(signal);
                delivered += 1;
            }
        }
        delivered
    }

    /// Take every pending signal for `id` in publish order.
    pub fn drain(&self, id: SubscriptionId) -> Vec<Signal> {
        self.inner
            .borrow_mut()
            .subscribers
            .get_mut(&id)
            .map(|subscriber| subscriber.mailbox.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}
