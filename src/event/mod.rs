//! Message-event plumbing.
//!
//! The bus is where a chat transport publishes inbound messages; the
//! dispatcher subscribes to it and routes command invocations into the
//! command engine.

mod bus;
mod dispatcher;

pub use bus::{
    ConcurrencyKind, EventPriority, MessageBus, MessageEvent, MessageSubscriber, SubscriptionId,
};
pub use dispatcher::InboundDispatcher;
