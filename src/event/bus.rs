//! In-process message-event bus.
//!
//! The boundary between the dispatch engine and whatever transport produces
//! inbound messages. Transports publish [`MessageEvent`]s; subscribers see
//! each event in priority order until one of them consumes it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::commands::CommandSender;

/// An inbound chat message.
#[derive(Clone)]
pub struct MessageEvent {
    /// Who sent the message.
    pub sender: Arc<dyn CommandSender>,

    /// Raw message text.
    pub content: String,
}

impl fmt::Debug for MessageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEvent")
            .field("sender", &self.sender.id())
            .field("content", &self.content)
            .finish()
    }
}

/// Scheduling priority of a subscriber relative to others.
///
/// Higher priorities see each event first and may stop propagation before
/// lower priorities run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventPriority {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}

/// How a single subscriber's handling may overlap across events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyKind {
    /// The subscriber may handle many events at once.
    Concurrent,

    /// Events are handed to the subscriber one at a time.
    Sequential,
}

/// Receives published message events.
#[async_trait]
pub trait MessageSubscriber: Send + Sync {
    /// Handles one event. Returning `true` consumes the event: subscribers
    /// at lower priority never see it.
    async fn on_message(&self, event: &MessageEvent) -> bool;
}

/// Identifies a subscription for [`MessageBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
struct Subscription {
    id: u64,
    priority: EventPriority,
    subscriber: Arc<dyn MessageSubscriber>,

    /// Present for sequential subscribers; held while handling an event.
    gate: Option<Arc<Mutex<()>>>,
}

/// Fans inbound message events out to prioritized subscribers.
///
/// Each published event is handled on its own task, so events are
/// processed concurrently with respect to each other and a failure inside
/// one event's handling cannot affect another's.
pub struct MessageBus {
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl MessageBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Adds a subscriber at the given priority.
    pub async fn subscribe(
        &self,
        priority: EventPriority,
        concurrency: ConcurrencyKind,
        subscriber: Arc<dyn MessageSubscriber>,
    ) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let gate = match concurrency {
            ConcurrencyKind::Sequential => Some(Arc::new(Mutex::new(()))),
            ConcurrencyKind::Concurrent => None,
        };

        let mut subs = self.subscriptions.write().await;
        subs.push(Subscription {
            id,
            priority,
            subscriber,
            gate,
        });
        // Stable sort: equal priorities keep subscription order.
        subs.sort_by(|a, b| b.priority.cmp(&a.priority));

        debug!("Subscriber {id} attached at {priority:?}");
        SubscriptionId(id)
    }

    /// Removes a subscription.
    ///
    /// Stops new deliveries to the subscriber; handling already in flight
    /// is not interrupted.
    pub async fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write().await;
        subs.retain(|sub| sub.id != id.0);
        debug!("Subscriber {} detached", id.0);
    }

    /// Publishes one event.
    ///
    /// The event is handled on its own task: subscribers run in priority
    /// order and the walk stops at the first one that consumes the event.
    /// Await the returned handle when completion matters (tests, shutdown);
    /// dropping it detaches the dispatch.
    pub async fn publish(&self, event: MessageEvent) -> JoinHandle<()> {
        let subs: Vec<Subscription> = self.subscriptions.read().await.clone();

        tokio::spawn(async move {
            for sub in subs {
                let consumed = match &sub.gate {
                    Some(gate) => {
                        let _held = gate.lock().await;
                        sub.subscriber.on_message(&event).await
                    }
                    None => sub.subscriber.on_message(&event).await,
                };
                if consumed {
                    debug!("Event consumed by subscriber {}", sub.id);
                    break;
                }
            }
        })
    }

    /// Number of active subscriptions.
    pub async fn subscriber_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus").finish_non_exhaustive()
    }
}
