//! Command dispatch engine.
//!
//! Commands register under lower-cased names in one of two namespaces:
//! required-prefix (`/name` only) and optional-prefix (`name` or `/name`).
//! Resolution is exact by default, with fuzzy matching as an explicit
//! fallback, and execution goes through a permission gate that normalizes
//! every failure into [`ExecuteError`].

pub mod fuzzy;

mod executor;
mod registry;
mod resolver;
mod types;

pub use executor::{ExecuteError, ExecuteErrorKind, execute};
pub use registry::CommandRegistry;
pub use resolver::CommandResolver;
pub use types::{Command, CommandSender};
