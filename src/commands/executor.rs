//! Command execution: permission gate, handler invocation, and failure
//! normalization.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::types::{Command, CommandSender};

/// Where an execution failure originated.
#[derive(Debug, Error)]
pub enum ExecuteErrorKind {
    /// The sender failed the command's permission predicate.
    #[error("permission denied")]
    PermissionDenied,

    /// The command handler itself failed.
    #[error("handler failed: {0}")]
    Handler(#[source] anyhow::Error),
}

/// Normalized failure produced by [`execute`], regardless of where in the
/// pipeline it originated.
///
/// Carries enough context to log or report without re-deriving it: the
/// command, the name it was invoked by, and the failure kind (wrapping the
/// original cause for handler failures).
#[derive(Error)]
#[error("command '{matched_name}' failed: {kind}")]
pub struct ExecuteError {
    /// The command that was being executed.
    pub command: Arc<dyn Command>,

    /// The name the command was invoked by, as typed by the sender.
    pub matched_name: String,

    /// What went wrong.
    #[source]
    pub kind: ExecuteErrorKind,
}

impl fmt::Debug for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteError")
            .field("command", &self.command.name())
            .field("matched_name", &self.matched_name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Executes `command` on behalf of `sender`.
///
/// When `check_permission` is set, the command's permission predicate runs
/// first and a denial fails without invoking the handler. Handler side
/// effects are not rolled back on failure; failures are reported, not
/// undone.
///
/// # Errors
///
/// Returns the normalized [`ExecuteError`] carrying the command, the
/// matched name, and the failure kind.
pub async fn execute(
    sender: &dyn CommandSender,
    command: Arc<dyn Command>,
    matched_name: &str,
    args: &[String],
    check_permission: bool,
) -> Result<(), ExecuteError> {
    if check_permission && !command.test_permission(sender) {
        debug!(
            "Sender '{}' denied permission for '{}'",
            sender.id(),
            command.name()
        );
        return Err(ExecuteError {
            command,
            matched_name: matched_name.to_owned(),
            kind: ExecuteErrorKind::PermissionDenied,
        });
    }

    match command.on_command(sender, args).await {
        Ok(()) => Ok(()),
        Err(cause) => Err(ExecuteError {
            command,
            matched_name: matched_name.to_owned(),
            kind: ExecuteErrorKind::Handler(cause),
        }),
    }
}
