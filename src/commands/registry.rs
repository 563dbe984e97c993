//! Shared registry of commands, keyed by lower-cased name.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::{Command, all_names};

/// The two name mappings, both keyed by lower-cased command name.
///
/// A name lives in at most one of the two maps at any time.
#[derive(Default)]
struct NameMaps {
    /// Names that must be invoked with the command prefix.
    required: HashMap<String, Arc<dyn Command>>,

    /// Names invokable with or without the prefix.
    optional: HashMap<String, Arc<dyn Command>>,
}

/// Registry of commands addressable by required- and optional-prefix names.
///
/// All mutation serializes on a single write lock; lookups take the read
/// lock and never observe a mapping mid-mutation. The registry shares
/// commands, it never copies them.
pub struct CommandRegistry {
    maps: RwLock<NameMaps>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            maps: RwLock::new(NameMaps::default()),
        }
    }

    /// Registers `command` under its primary name and all aliases.
    ///
    /// Any existing binding for one of those names is replaced, in
    /// whichever mapping it lived, so a name never resolves through both
    /// mappings at once. Last write wins.
    pub async fn register(&self, command: Arc<dyn Command>, require_prefix: bool) {
        let mut maps = self.maps.write().await;
        for name in all_names(command.as_ref()) {
            let key = name.to_lowercase();
            if require_prefix {
                maps.optional.remove(&key);
                maps.required.insert(key, Arc::clone(&command));
            } else {
                maps.required.remove(&key);
                maps.optional.insert(key, Arc::clone(&command));
            }
        }
        info!(
            "Registered command '{}' (prefix required: {})",
            command.name(),
            require_prefix
        );
    }

    /// Removes every binding that points at this exact command instance.
    pub async fn unregister(&self, command: &Arc<dyn Command>) {
        let mut maps = self.maps.write().await;
        maps.required.retain(|_, bound| !Arc::ptr_eq(bound, command));
        maps.optional.retain(|_, bound| !Arc::ptr_eq(bound, command));
        debug!("Unregistered command '{}'", command.name());
    }

    /// Looks up a command by exact name, required-prefix mapping first.
    pub async fn lookup_exact(&self, name: &str) -> Option<Arc<dyn Command>> {
        let key = name.to_lowercase();
        let maps = self.maps.read().await;
        maps.required
            .get(&key)
            .or_else(|| maps.optional.get(&key))
            .cloned()
    }

    /// Looks up a name in the optional-prefix mapping only.
    pub(crate) async fn lookup_optional(&self, name: &str) -> Option<Arc<dyn Command>> {
        let key = name.to_lowercase();
        self.maps.read().await.optional.get(&key).cloned()
    }

    /// Point-in-time copy of the names in the requested mapping.
    ///
    /// Fuzzy scans run over the copy so the lock is not held for the
    /// duration of an O(n) scan.
    pub async fn snapshot_names(&self, require_prefix: bool) -> Vec<String> {
        let maps = self.maps.read().await;
        let map = if require_prefix {
            &maps.required
        } else {
            &maps.optional
        };
        map.keys().cloned().collect()
    }

    /// Number of name bindings across both mappings.
    pub async fn len(&self) -> usize {
        let maps = self.maps.read().await;
        maps.required.len() + maps.optional.len()
    }

    /// Whether no commands are registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandSender;
    use async_trait::async_trait;

    struct Named {
        name: String,
        aliases: Vec<&'static str>,
    }

    impl Named {
        fn new(name: &str) -> Arc<dyn Command> {
            Arc::new(Self {
                name: name.to_owned(),
                aliases: Vec::new(),
            })
        }

        fn with_aliases(name: &str, aliases: Vec<&'static str>) -> Arc<dyn Command> {
            Arc::new(Self {
                name: name.to_owned(),
                aliases,
            })
        }
    }

    #[async_trait]
    impl Command for Named {
        fn name(&self) -> &str {
            &self.name
        }

        fn aliases(&self) -> &[&str] {
            &self.aliases
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

    #[tokio::test]
    async fn register_and_lookup() {
        let registry = CommandRegistry::new();
        registry.register(Named::new("mute"), true).await;

        assert!(registry.lookup_exact("mute").await.is_some());
        assert!(registry.lookup_exact("kick").await.is_none());
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let registry = CommandRegistry::new();
        registry.register(Named::new("Mute"), true).await;

        assert!(registry.lookup_exact("MUTE").await.is_some());
        assert!(registry.snapshot_names(true).await.contains(&"mute".to_owned()));
    }

    #[tokio::test]
    async fn aliases_bind_to_the_same_command() {
        let registry = CommandRegistry::new();
        registry
            .register(Named::with_aliases("mute", vec!["jinyan"]), true)
            .await;

        let by_name = registry.lookup_exact("mute").await.unwrap();
        let by_alias = registry.lookup_exact("jinyan").await.unwrap();
        assert!(Arc::ptr_eq(&by_name, &by_alias));
    }

    #[tokio::test]
    async fn reregistering_replaces_the_binding() {
        let registry = CommandRegistry::new();
        let first = Named::new("mute");
        let second = Named::new("mute");

        registry.register(Arc::clone(&first), true).await;
        registry.register(Arc::clone(&second), true).await;

        let bound = registry.lookup_exact("mute").await.unwrap();
        assert!(Arc::ptr_eq(&bound, &second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn registration_moves_a_name_between_mappings() {
        let registry = CommandRegistry::new();
        registry.register(Named::new("ping"), true).await;
        registry.register(Named::new("ping"), false).await;

        assert!(!registry.snapshot_names(true).await.contains(&"ping".to_owned()));
        assert!(registry.snapshot_names(false).await.contains(&"ping".to_owned()));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn unregister_removes_all_names() {
        let registry = CommandRegistry::new();
        let command = Named::with_aliases("mute", vec!["jinyan", "silence"]);
        registry.register(Arc::clone(&command), true).await;
        assert_eq!(registry.len().await, 3);

        registry.unregister(&command).await;
        assert!(registry.is_empty().await);
        assert!(registry.lookup_exact("jinyan").await.is_none());
    }

    #[tokio::test]
    async fn unregister_leaves_other_commands_alone() {
        let registry = CommandRegistry::new();
        let mute = Named::new("mute");
        let kick = Named::new("kick");
        registry.register(Arc::clone(&mute), true).await;
        registry.register(Arc::clone(&kick), true).await;

        registry.unregister(&mute).await;
        assert!(registry.lookup_exact("kick").await.is_some());
        assert!(registry.lookup_exact("mute").await.is_none());
    }

    #[tokio::test]
    async fn snapshot_is_isolated_from_later_mutation() {
        let registry = CommandRegistry::new();
        registry.register(Named::new("mute"), true).await;

        let snapshot = registry.snapshot_names(true).await;
        registry.register(Named::new("kick"), true).await;

        assert_eq!(snapshot, vec!["mute".to_owned()]);
    }

    #[tokio::test]
    async fn concurrent_registration_loses_no_updates() {
        let registry = Arc::new(CommandRegistry::new());

        let registrations = (0..100).map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry.register(Named::new(&format!("cmd{i}")), true).await;
            })
        });
        for result in futures::future::join_all(registrations).await {
            result.unwrap();
        }

        let lookups = (0..100).map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.lookup_exact(&format!("cmd{i}")).await.is_some() })
        });
        for result in futures::future::join_all(lookups).await {
            assert!(result.unwrap());
        }
        assert_eq!(registry.len().await, 100);
    }
}
