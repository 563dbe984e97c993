//! Built-in console commands.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::commands::{Command, CommandRegistry, CommandSender};

/// Control messages for the console main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMessage {
    /// Stop the console.
    Shutdown,
}

/// Lists the registered commands.
pub struct HelpCommand {
    registry: Arc<CommandRegistry>,
    prefix: char,
}

impl HelpCommand {
    #[must_use]
    pub fn new(registry: Arc<CommandRegistry>, prefix: char) -> Self {
        Self { registry, prefix }
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> &[&str] {
        &["h"]
    }

    fn prefix_optional(&self) -> bool {
        true
    }

    fn test_permission(&self, _sender: &dyn CommandSender) -> bool {
        true
    }

    async fn on_command(&self, sender: &dyn CommandSender, _args: &[String]) -> anyhow::Result<()> {
        let mut required = self.registry.snapshot_names(true).await;
        let mut optional = self.registry.snapshot_names(false).await;
        required.sort();
        optional.sort();

        let mut lines = vec!["Available commands:".to_owned()];
        for name in required {
            lines.push(format!("  {}{name}", self.prefix));
        }
        for name in optional {
            lines.push(format!("  {name}"));
        }
        sender.send_message(&lines.join("\n")).await
    }
}

/// Replies with its arguments.
pub struct EchoCommand;

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn test_permission(&self, _sender: &dyn CommandSender) -> bool {
        true
    }

    async fn on_command(&self, sender: &dyn CommandSender, args: &[String]) -> anyhow::Result<()> {
        sender.send_message(&args.join(" ")).await
    }
}

/// Stops the console process. Only the local console operator may run it.
pub struct StopCommand {
    console_tx: mpsc::Sender<ConsoleMessage>,
}

impl StopCommand {
    #[must_use]
    pub fn new(console_tx: mpsc::Sender<ConsoleMessage>) -> Self {
        Self { console_tx }
    }
}

#[async_trait]
impl Command for StopCommand {
    fn name(&self) -> &str {
        "stop"
    }

    fn aliases(&self) -> &[&str] {
        &["shutdown"]
    }

    fn test_permission(&self, sender: &dyn CommandSender) -> bool {
        sender.id() == "console"
    }

    async fn on_command(&self, sender: &dyn CommandSender, _args: &[String]) -> anyhow::Result<()> {
        debug!("Stop requested by '{}'", sender.id());
        sender.send_message("Shutting down...").await?;
        self.console_tx.send(ConsoleMessage::Shutdown).await?;
        Ok(())
    }
}
