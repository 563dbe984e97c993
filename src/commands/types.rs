//! Core traits for commands and their senders.

use async_trait::async_trait;

/// A participant that can issue commands and receive replies.
///
/// Implementations wrap whatever the underlying chat transport calls a
/// sender: the local console operator, a group member, another bot.
#[async_trait]
pub trait CommandSender: Send + Sync {
    /// Stable identity of the sender, used for permission checks and logging.
    fn id(&self) -> &str;

    /// Human-readable name for display purposes.
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Sends a message back to the sender.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails to deliver.
    async fn send_message(&self, text: &str) -> anyhow::Result<()>;
}

/// A command exposed to the dispatch engine.
///
/// Commands are registered once and shared as `Arc<dyn Command>`; the
/// registry never copies a command, and all names are matched
/// case-insensitively. Replacing a name's binding is a registry operation,
/// not a mutation of the command itself.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name of the command, its identity in the registry.
    fn name(&self) -> &str;

    /// Alternate names that resolve to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Whether the command prefix may be omitted when invoking this command.
    fn prefix_optional(&self) -> bool {
        false
    }

    /// Checks whether `sender` is allowed to run this command.
    fn test_permission(&self, sender: &dyn CommandSender) -> bool;

    /// Runs the command with the remaining message components as arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler fails; the executor wraps it as the
    /// failure cause.
    async fn on_command(&self, sender: &dyn CommandSender, args: &[String]) -> anyhow::Result<()>;
}

/// Iterates the primary name followed by all aliases.
pub(crate) fn all_names(command: &dyn Command) -> impl Iterator<Item = &str> {
    std::iter::once(command.name()).chain(command.aliases().iter().copied())
}
