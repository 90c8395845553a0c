use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Notifications emitted by the playback engine.
///
/// Emissions are synchronous within the operation that causes them:
/// `TextChanged` always precedes the first `ProgressChanged` of a load, and
/// `ProgressChanged` indices are strictly increasing while playing forward.
#[derive(Debug, Clone)]
pub enum ReaderEvent {
    TextChanged { text: Arc<str> },
    ProgressChanged { index: usize, total: usize },
    SpeedChanged { wpm: u32 },
}

impl ReaderEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ReaderEvent::TextChanged { .. } => "text_changed",
            ReaderEvent::ProgressChanged { .. } => "progress_changed",
            ReaderEvent::SpeedChanged { .. } => "speed_changed",
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&ReaderEvent) + Send + Sync>;

/// Multi-subscriber fan-out for reader notifications.
///
/// Every subscriber receives every emission, in registration order. Cloning
/// the bus yields another handle onto the same subscriber list.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<(SubscriptionId, Callback)>>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a callback for every emitted event.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ReaderEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.subscribers
            .lock()
            .unwrap()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns false if the id was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    /// Deliver an event to every subscriber in registration order.
    pub fn emit(&self, event: &ReaderEvent) {
        let subscribers = self.subscribers.lock().unwrap();
        for (_, callback) in subscribers.iter() {
            callback(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
