//! Inbound message dispatch: the bridge from the event bus to the command
//! engine.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::bus::{
    ConcurrencyKind, EventPriority, MessageBus, MessageEvent, MessageSubscriber, SubscriptionId,
};
use crate::commands::{CommandResolver, execute};

/// Routes inbound messages to registered commands.
///
/// A message whose leading token resolves to a command is executed under
/// the permission gate and consumed, so lower-priority subscribers never
/// see it. Everything else passes through untouched. Execution failures are
/// reported to the sender and logged; they never escape the event's task.
pub struct InboundDispatcher {
    resolver: CommandResolver,
}

impl InboundDispatcher {
    /// Creates a dispatcher resolving against `resolver`.
    #[must_use]
    pub fn new(resolver: CommandResolver) -> Self {
        Self { resolver }
    }

    /// Attaches the dispatcher to `bus` with concurrent delivery and high
    /// priority.
    pub async fn attach(self: Arc<Self>, bus: &MessageBus) -> SubscriptionId {
        bus.subscribe(EventPriority::High, ConcurrencyKind::Concurrent, self)
            .await
    }

    /// Handles one inbound message; returns whether a command ran.
    async fn dispatch(&self, event: &MessageEvent) -> bool {
        let mut components = event.content.split_whitespace();
        let Some(head) = components.next() else {
            return false;
        };
        let Some(command) = self.resolver.resolve(head).await else {
            return false;
        };

        let args: Vec<String> = components.map(str::to_owned).collect();
        debug!(
            "Dispatching '{}' for sender '{}' with {} argument(s)",
            command.name(),
            event.sender.display_name(),
            args.len()
        );

        if let Err(err) = execute(event.sender.as_ref(), command, head, &args, true).await {
            error!(
                "Command '{}' failed for sender '{}': {err}",
                err.matched_name,
                event.sender.id()
            );
            let _ = event
                .sender
                .send_message(&format!("Command failed: {err}"))
                .await;
        }

        true
    }
}

#[async_trait]
impl MessageSubscriber for InboundDispatcher {
    async fn on_message(&self, event: &MessageEvent) -> bool {
        self.dispatch(event).await
    }
}

impl std::fmt::Debug for InboundDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundDispatcher")
            .field("resolver", &self.resolver)
            .finish()
    }
}
