//! Configuration module for the command console.
//!
//! Handles loading and validation of console settings: the command prefix
//! and logging defaults.

mod settings;

pub use settings::{ConfigError, ConsoleSettings};

/// Default command prefix character.
pub const DEFAULT_COMMAND_PREFIX: char = '/';
