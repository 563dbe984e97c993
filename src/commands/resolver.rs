//! Resolution of raw message tokens into registered commands.

use std::sync::Arc;

use tracing::debug;

use super::fuzzy;
use super::registry::CommandRegistry;
use super::types::Command;

/// Resolves the leading token of a message into a registered command.
///
/// A missing binding is an empty result, never an error; an ambiguous fuzzy
/// match is indistinguishable from a miss.
pub struct CommandResolver {
    registry: Arc<CommandRegistry>,
    prefix: char,
}

impl CommandResolver {
    /// Creates a resolver over `registry` with the given prefix character.
    #[must_use]
    pub fn new(registry: Arc<CommandRegistry>, prefix: char) -> Self {
        Self { registry, prefix }
    }

    /// The configured command prefix character.
    #[must_use]
    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Resolves `raw_token` to a command by exact name.
    ///
    /// A leading prefix selects the required-prefix namespace, falling back
    /// to optional-prefix commands, which accept the prefix as well. A bare
    /// token reaches only optional-prefix commands. Fuzzy matching is the
    /// separate, explicitly invoked [`resolve_fuzzy`](Self::resolve_fuzzy).
    pub async fn resolve(&self, raw_token: &str) -> Option<Arc<dyn Command>> {
        let (name, had_prefix) = self.split_prefix(raw_token);
        if name.is_empty() {
            return None;
        }
        let name = name.to_lowercase();

        if had_prefix {
            self.registry.lookup_exact(&name).await
        } else {
            self.registry.lookup_optional(&name).await
        }
    }

    /// Resolves `raw_token` approximately, over the same namespace that
    /// [`resolve`](Self::resolve) would search.
    ///
    /// Scores a snapshot of the registered names so the registry lock is
    /// not held during the scan. Two or more perfect matches make the
    /// result ambiguous and resolve to `None`.
    pub async fn resolve_fuzzy(&self, raw_token: &str) -> Option<Arc<dyn Command>> {
        let (name, had_prefix) = self.split_prefix(raw_token);
        if name.is_empty() {
            return None;
        }
        let query = name.to_lowercase();

        let pool = if had_prefix {
            let mut names = self.registry.snapshot_names(true).await;
            names.extend(self.registry.snapshot_names(false).await);
            names
        } else {
            self.registry.snapshot_names(false).await
        };

        let best = fuzzy::unique_best_match(&pool, String::as_str, &query)?;
        debug!("Fuzzy-resolved '{raw_token}' to '{best}'");

        if had_prefix {
            self.registry.lookup_exact(best).await
        } else {
            self.registry.lookup_optional(best).await
        }
    }

    /// Strips one leading prefix character, remembering whether it was there.
    fn split_prefix<'a>(&self, raw_token: &'a str) -> (&'a str, bool) {
        raw_token
            .strip_prefix(self.prefix)
            .map_or((raw_token, false), |rest| (rest, true))
    }
}

impl std::fmt::Debug for CommandResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandResolver")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandSender;
    use async_trait::async_trait;

    struct Named {
        name: &'static str,
        aliases: Vec<&'static str>,
        prefix_optional: bool,
    }

    #[async_trait]
    impl Command for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn aliases(&self) -> &[&str] {
            &self.aliases
        }

        fn prefix_optional(&self) -> bool {
            self.prefix_optional
        }

        fn test_permission(&self, _sender: &dyn CommandSender) -> bool {
            true
        }

        async fn on_command(
            &self,
            _sender: &dyn CommandSender,
            _args: &[String],
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn command(name: &'static str, aliases: Vec<&'static str>, prefix_optional: bool) -> Arc<dyn Command> {
        Arc::new(Named {
            name,
            aliases,
            prefix_optional,
        })
    }

    async fn resolver_with(commands: Vec<Arc<dyn Command>>) -> CommandResolver {
        let registry = Arc::new(CommandRegistry::new());
        for cmd in commands {
            let require_prefix = !cmd.prefix_optional();
            registry.register(cmd, require_prefix).await;
        }
        CommandResolver::new(registry, '/')
    }

    #[tokio::test]
    async fn alias_resolves_to_the_same_command() {
        let resolver = resolver_with(vec![command("mute", vec!["jinyan"], false)]).await;

        let by_name = resolver.resolve("/mute").await.unwrap();
        let by_alias = resolver.resolve("/jinyan").await.unwrap();
        assert!(Arc::ptr_eq(&by_name, &by_alias));
    }

    #[tokio::test]
    async fn required_prefix_command_needs_the_prefix() {
        let resolver = resolver_with(vec![command("mute", vec![], false)]).await;

        assert!(resolver.resolve("/mute").await.is_some());
        assert!(resolver.resolve("mute").await.is_none());
    }

    #[tokio::test]
    async fn optional_prefix_command_works_both_ways() {
        let resolver = resolver_with(vec![command("ping", vec![], true)]).await;

        assert!(resolver.resolve("ping").await.is_some());
        assert!(resolver.resolve("/ping").await.is_some());
    }

    #[tokio::test]
    async fn resolution_is_case_insensitive() {
        let resolver = resolver_with(vec![command("mute", vec![], false)]).await;

        assert!(resolver.resolve("/MuTe").await.is_some());
    }

    #[tokio::test]
    async fn bare_prefix_resolves_to_nothing() {
        let resolver = resolver_with(vec![command("mute", vec![], false)]).await;

        assert!(resolver.resolve("/").await.is_none());
        assert!(resolver.resolve("").await.is_none());
    }

    #[tokio::test]
    async fn fuzzy_resolves_a_near_miss_token() {
        let resolver = resolver_with(vec![
            command("mute", vec![], false),
            command("kick", vec![], false),
        ]).await;

        let resolved = resolver.resolve_fuzzy("/mut").await.unwrap();
        assert_eq!(resolved.name(), "mute");
    }

    #[tokio::test]
    async fn fuzzy_rejects_an_ambiguous_token() {
        // "mute" matches exactly, "mutf" via the last-character leniency;
        // two perfect scores mean no unique winner.
        let resolver = resolver_with(vec![
            command("mute", vec![], false),
            command("mutf", vec![], false),
        ]).await;

        assert!(resolver.resolve_fuzzy("/mute").await.is_none());
    }

    #[tokio::test]
    async fn fuzzy_respects_the_prefix_namespace() {
        let resolver = resolver_with(vec![command("mute", vec![], false)]).await;

        // Required-prefix commands are not reachable from a bare token,
        // fuzzily or otherwise.
        assert!(resolver.resolve_fuzzy("mut").await.is_none());
        assert!(resolver.resolve_fuzzy("/mut").await.is_some());
    }
}
