//! The definition registry: name to definition mapping plus alias table.

use std::collections::HashMap;

use crate::error::{LoaderError, Result};
use crate::types::Definition;

/// Mapping store of definitions and aliases, shared across one
/// configuration-loading session.
///
/// Registration order is preserved for [`DefinitionRegistry::definition_names`].
/// The registry is single-writer by construction: the loader issues plain
/// register calls and nested imports run synchronously on the same thread.
pub struct DefinitionRegistry {
    definitions: HashMap<String, Definition>,
    names: Vec<String>,
    aliases: HashMap<String, String>,
    allow_overriding: bool,
}

impl DefinitionRegistry {
    /// Create an empty registry. Overriding is allowed by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            names: Vec::new(),
            aliases: HashMap::new(),
            allow_overriding: true,
        }
    }

    /// Control whether re-registering an existing name replaces it.
    pub fn set_allow_overriding(&mut self, allow: bool) {
        self.allow_overriding = allow;
    }

    /// Whether duplicate registrations replace the existing definition.
    #[must_use]
    pub fn allow_overriding(&self) -> bool {
        self.allow_overriding
    }

    /// Register a definition under its primary name.
    ///
    /// # Errors
    /// [`LoaderError::DuplicateDefinition`] when the name is taken and
    /// overriding is disabled.
    pub fn register(&mut self, name: impl Into<String>, definition: Definition) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.definitions.get(&name) {
            if !self.allow_overriding {
                return Err(LoaderError::DuplicateDefinition { name });
            }
            tracing::debug!(
                name = %name,
                old_class = ?existing.class_name,
                new_class = ?definition.class_name,
                "Overriding definition"
            );
        } else {
            self.names.push(name.clone());
        }
        self.definitions.insert(name, definition);
        Ok(())
    }

    /// Register an alias for a definition name.
    ///
    /// The target name does not have to be registered yet; forward aliases
    /// are legal and resolve once the definition arrives. An alias equal to
    /// its name is a no-op that removes any previous binding.
    ///
    /// # Errors
    /// [`LoaderError::AliasConflict`] when the alias is already bound to a
    /// different name, [`LoaderError::AliasCycle`] when the registration
    /// would make alias resolution loop.
    pub fn register_alias(&mut self, name: &str, alias: &str) -> Result<()> {
        if alias == name {
            self.aliases.remove(alias);
            return Ok(());
        }

        if let Some(existing) = self.aliases.get(alias) {
            if existing == name {
                return Ok(());
            }
            return Err(LoaderError::AliasConflict {
                alias: alias.to_string(),
                name: name.to_string(),
                existing: existing.clone(),
            });
        }

        if self.has_alias(alias, name) {
            return Err(LoaderError::AliasCycle {
                alias: alias.to_string(),
                name: name.to_string(),
            });
        }

        self.aliases.insert(alias.to_string(), name.to_string());
        tracing::debug!(alias = %alias, name = %name, "Registered alias");
        Ok(())
    }

    /// Whether `alias` is registered for `name`, directly or transitively.
    fn has_alias(&self, name: &str, alias: &str) -> bool {
        self.aliases.iter().any(|(registered, target)| {
            target == name && (registered == alias || self.has_alias(registered, alias))
        })
    }

    /// Resolve a name to its canonical definition name, following alias
    /// chains.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        while let Some(target) = self.aliases.get(current) {
            current = target;
        }
        current
    }

    /// Look up a definition by name or alias.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(self.resolve(name))
    }

    /// Whether a definition is registered under this primary name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Whether the name is a registered alias.
    #[must_use]
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Primary names in registration order.
    #[must_use]
    pub fn definition_names(&self) -> &[String] {
        &self.names
    }

    /// All aliases bound (directly or transitively) to a name.
    #[must_use]
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        let mut result = Vec::new();
        for (alias, target) in &self.aliases {
            if target == name {
                result.push(alias.as_str());
                for transitive in self.aliases_of(alias) {
                    result.push(transitive);
                }
            }
        }
        result.sort_unstable();
        result
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = DefinitionRegistry::new();
        registry
            .register("service", Definition::with_class("app.Service"))
            .unwrap();

        assert!(registry.contains("service"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.definition("service").unwrap().class_name.as_deref(),
            Some("app.Service")
        );
    }

    #[test]
    fn test_register_preserves_order() {
        let mut registry = DefinitionRegistry::new();
        registry.register("b", Definition::default()).unwrap();
        registry.register("a", Definition::default()).unwrap();
        registry.register("c", Definition::default()).unwrap();

        assert_eq!(registry.definition_names(), ["b", "a", "c"]);
    }

    #[test]
    fn test_register_override_allowed() {
        let mut registry = DefinitionRegistry::new();
        registry
            .register("x", Definition::with_class("app.First"))
            .unwrap();
        registry
            .register("x", Definition::with_class("app.Second"))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.definition("x").unwrap().class_name.as_deref(),
            Some("app.Second")
        );
    }

    #[test]
    fn test_register_override_disallowed() {
        let mut registry = DefinitionRegistry::new();
        registry.set_allow_overriding(false);
        registry.register("x", Definition::default()).unwrap();

        let err = registry.register("x", Definition::default()).unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateDefinition { ref name } if name == "x"));
    }

    #[test]
    fn test_alias_resolution() {
        let mut registry = DefinitionRegistry::new();
        registry
            .register("service", Definition::with_class("app.Service"))
            .unwrap();
        registry.register_alias("service", "svc").unwrap();

        assert_eq!(registry.resolve("svc"), "service");
        assert_eq!(
            registry.definition("svc").unwrap(),
            registry.definition("service").unwrap()
        );
    }

    #[test]
    fn test_alias_before_definition() {
        let mut registry = DefinitionRegistry::new();
        registry.register_alias("service", "svc").unwrap();
        registry
            .register("service", Definition::with_class("app.Service"))
            .unwrap();

        assert_eq!(
            registry.definition("svc").unwrap().class_name.as_deref(),
            Some("app.Service")
        );
    }

    #[test]
    fn test_alias_conflict() {
        let mut registry = DefinitionRegistry::new();
        registry.register_alias("x", "y").unwrap();

        let err = registry.register_alias("z", "y").unwrap_err();
        assert!(matches!(err, LoaderError::AliasConflict { .. }));
        // First binding survives
        assert_eq!(registry.resolve("y"), "x");
    }

    #[test]
    fn test_alias_reregistration_idempotent() {
        let mut registry = DefinitionRegistry::new();
        registry.register_alias("x", "y").unwrap();
        registry.register_alias("x", "y").unwrap();
        assert_eq!(registry.resolve("y"), "x");
    }

    #[test]
    fn test_alias_equal_to_name_removes_binding() {
        let mut registry = DefinitionRegistry::new();
        registry.register_alias("x", "y").unwrap();
        registry.register_alias("y", "y").unwrap();
        assert!(!registry.is_alias("y"));
    }

    #[test]
    fn test_alias_cycle_rejected() {
        let mut registry = DefinitionRegistry::new();
        registry.register_alias("a", "b").unwrap();

        let err = registry.register_alias("b", "a").unwrap_err();
        assert!(matches!(err, LoaderError::AliasCycle { .. }));
    }

    #[test]
    fn test_alias_chain_resolution() {
        let mut registry = DefinitionRegistry::new();
        registry.register_alias("a", "b").unwrap();
        registry.register_alias("b", "c").unwrap();
        assert_eq!(registry.resolve("c"), "a");
    }

    #[test]
    fn test_aliases_of() {
        let mut registry = DefinitionRegistry::new();
        registry.register_alias("a", "b").unwrap();
        registry.register_alias("b", "c").unwrap();

        assert_eq!(registry.aliases_of("a"), vec!["b", "c"]);
        assert!(registry.aliases_of("missing").is_empty());
    }
}
