//! Sender implementation for the local console.

use async_trait::async_trait;

use crate::commands::CommandSender;

/// The local console operator. Replies go to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSender;

#[async_trait]
impl CommandSender for ConsoleSender {
    fn id(&self) -> &str {
        "console"
    }

    async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        println!("{text}");
        Ok(())
    }
}
