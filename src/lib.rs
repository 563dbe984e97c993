//! Command Console Library
//!
//! A command dispatch engine for a chat-bot console.
//!
//! This crate provides the core functionality for:
//! - Registering commands under required- and optional-prefix names
//! - Resolving user-typed tokens to commands, exactly or approximately
//! - Executing commands under a permission gate with normalized failures
//! - Fanning inbound message events out to prioritized subscribers

pub mod commands;
pub mod config;
pub mod console;
pub mod event;
