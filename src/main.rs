//! Command Console - Main Entry Point
//!
//! Wires the command dispatch engine to a local console: stdin lines become
//! message events, registered commands handle them, replies go to stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use command_console::commands::{Command, CommandRegistry, CommandResolver, CommandSender};
use command_console::config::ConsoleSettings;
use command_console::console::{
    ConsoleMessage, ConsoleSender, EchoCommand, HelpCommand, StopCommand,
};
use command_console::event::{InboundDispatcher, MessageBus, MessageEvent};

/// Chat-bot command console.
#[derive(Parser, Debug)]
#[command(name = "command_console")]
#[command(about = "Dispatch chat commands from a local console")]
#[command(version)]
struct Args {
    /// Path to an optional JSON settings file.
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load settings
    let settings = match &args.config {
        Some(path) => {
            ConsoleSettings::load_from_file(path).context("Failed to load console settings")?
        }
        None => ConsoleSettings::from_env_with_defaults(),
    };

    info!("Command prefix: {}", settings.command_prefix);

    // Build the engine: one registry and one bus, owned here and passed
    // down; lifecycle ends with this process.
    let registry = Arc::new(CommandRegistry::new());
    let bus = Arc::new(MessageBus::new());

    let (console_tx, mut console_rx) = mpsc::channel::<ConsoleMessage>(8);

    register_builtins(&registry, settings.command_prefix, console_tx).await;

    let resolver = CommandResolver::new(Arc::clone(&registry), settings.command_prefix);
    let dispatcher = Arc::new(InboundDispatcher::new(resolver));
    let subscription = dispatcher.attach(&bus).await;

    info!(
        "Console is running. Type {}help for commands, Ctrl+C to stop.",
        settings.command_prefix
    );

    // Feed stdin lines into the bus as message events
    let input_bus = Arc::clone(&bus);
    let reader_handle = tokio::spawn(async move {
        let sender: Arc<dyn CommandSender> = Arc::new(ConsoleSender);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            let _ = input_bus
                .publish(MessageEvent {
                    sender: Arc::clone(&sender),
                    content: line,
                })
                .await;
        }
    });

    // Wait for shutdown
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        msg = console_rx.recv() => {
            match msg {
                Some(ConsoleMessage::Shutdown) | None => info!("Shutdown requested"),
            }
        }
    }

    // Cleanup: stop new dispatch; in-flight commands run to completion.
    bus.unsubscribe(subscription).await;
    reader_handle.abort();
    info!("Console stopped");

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Registers the built-in console commands.
async fn register_builtins(
    registry: &Arc<CommandRegistry>,
    prefix: char,
    console_tx: mpsc::Sender<ConsoleMessage>,
) {
    let help: Arc<dyn Command> = Arc::new(HelpCommand::new(Arc::clone(registry), prefix));
    registry.register(Arc::clone(&help), !help.prefix_optional()).await;

    let echo: Arc<dyn Command> = Arc::new(EchoCommand);
    registry.register(Arc::clone(&echo), !echo.prefix_optional()).await;

    let stop: Arc<dyn Command> = Arc::new(StopCommand::new(console_tx));
    registry.register(Arc::clone(&stop), !stop.prefix_optional()).await;
}
