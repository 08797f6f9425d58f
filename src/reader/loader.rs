//! The definition loader: one depth-first pass per document, dispatching
//! elements into registry mutations.

use std::collections::HashSet;

use roxmltree::{Document, Node};

use crate::config::{
    has_text, tokenize_multi_value, ALIAS_ATTRIBUTE, ALIAS_ELEMENT, DEFINITIONS_ELEMENT,
    DEFINITION_ELEMENT, IMPORT_ELEMENT, NAME_ATTRIBUTE, PROFILE_ATTRIBUTE, RESOURCE_ATTRIBUTE,
};
use crate::env::Environment;
use crate::error::Result;
use crate::namespace::{NamespaceContext, NamespaceHandler, NamespaceHandlerResolver};
use crate::reader::delegate::ParserDelegate;
use crate::reader::events::{AliasRegistered, ImportProcessed, ReaderEventListener};
use crate::reader::problems::{Problem, ProblemCollector};
use crate::registry::DefinitionRegistry;
use crate::resource::{apply_relative_path, is_absolute_location, ResourceLoader};
use crate::types::DefinitionHolder;
use crate::xml::{element_children, get_attribute, get_tag_name};

/// Extension points invoked around each container element, before and
/// after its children are dispatched. Both default to no-ops.
pub trait ReaderHooks {
    /// Called before any child of a container element is processed.
    fn pre_process(&mut self, root: Node<'_, '_>) {
        let _ = root;
    }

    /// Called after all children of a container element were processed.
    fn post_process(&mut self, root: Node<'_, '_>) {
        let _ = root;
    }
}

struct NoopHooks;

impl ReaderHooks for NoopHooks {}

/// Loads wiring documents into a definition registry.
///
/// One loader represents one configuration-loading session: the registry
/// is shared across every document the session touches (directly or via
/// imports), problems accumulate across the whole session, and listeners
/// see every registration. Imports are synchronous: an imported document
/// is fully registered before the importing document's next sibling is
/// processed.
///
/// # Examples
/// ```
/// use wirecfg::reader::DefinitionLoader;
/// use wirecfg::resource::FsResourceLoader;
///
/// let mut loader = DefinitionLoader::new(FsResourceLoader::new("."));
/// let count = loader
///     .load_str(r#"<definitions><definition id="svc" class="app.Service"/></definitions>"#, "inline.xml")
///     .unwrap();
/// assert_eq!(count, 1);
/// assert!(loader.registry().contains("svc"));
/// ```
pub struct DefinitionLoader<L: ResourceLoader> {
    registry: DefinitionRegistry,
    environment: Environment,
    resources: L,
    namespaces: NamespaceHandlerResolver,
    problems: ProblemCollector,
    listeners: Vec<Box<dyn ReaderEventListener>>,
    hooks: Box<dyn ReaderHooks>,
    loading: HashSet<String>,
}

impl<L: ResourceLoader> DefinitionLoader<L> {
    /// Create a loader with a fresh registry and an empty environment.
    #[must_use]
    pub fn new(resources: L) -> Self {
        Self {
            registry: DefinitionRegistry::new(),
            environment: Environment::new(),
            resources,
            namespaces: NamespaceHandlerResolver::new(),
            problems: ProblemCollector::new(),
            listeners: Vec::new(),
            hooks: Box::new(NoopHooks),
            loading: HashSet::new(),
        }
    }

    /// Replace the environment used for profile gating and placeholder
    /// resolution.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// The shared registry.
    #[must_use]
    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// Mutable access to the registry (e.g. to set override policy).
    pub fn registry_mut(&mut self) -> &mut DefinitionRegistry {
        &mut self.registry
    }

    /// Consume the loader, yielding the populated registry and the
    /// problems reported along the way.
    #[must_use]
    pub fn into_parts(self) -> (DefinitionRegistry, Vec<Problem>) {
        (self.registry, self.problems.problems().to_vec())
    }

    /// Problems reported so far.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        self.problems.problems()
    }

    /// Register an event listener.
    pub fn add_listener(&mut self, listener: impl ReaderEventListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Install pre/post-processing hooks.
    pub fn set_hooks(&mut self, hooks: impl ReaderHooks + 'static) {
        self.hooks = Box::new(hooks);
    }

    /// Register a custom-namespace handler.
    pub fn register_namespace_handler(
        &mut self,
        uri: impl Into<String>,
        handler: impl NamespaceHandler + 'static,
    ) {
        self.namespaces.register(uri, handler);
    }

    /// Load all documents a location expands to.
    ///
    /// Returns the number of definitions registered, including those from
    /// nested imports.
    ///
    /// # Errors
    /// Fails hard on an unreadable or unparsable top-level resource;
    /// per-element faults inside documents are accumulated as problems
    /// instead.
    pub fn load(&mut self, location: &str) -> Result<usize> {
        let mut count = 0;
        for resolved in self.resources.expand(location)? {
            count += self.load_resource(&resolved)?;
        }
        Ok(count)
    }

    /// Parse document content directly, without going through the
    /// resource loader. `location` is used for problem context and for
    /// resolving relative imports.
    pub fn load_str(&mut self, content: &str, location: &str) -> Result<usize> {
        let doc = Document::parse(content)?;
        let before = self.registry.len();
        tracing::debug!(resource = %location, "Loading definitions");
        self.register_document(doc.root_element(), location, None);
        Ok(self.registry.len() - before)
    }

    fn load_resource(&mut self, location: &str) -> Result<usize> {
        let canonical = self.resources.canonical(location);
        if !self.loading.insert(canonical.clone()) {
            self.problems
                .report_plain(format!("Detected cyclic import of '{location}'"), location);
            return Ok(0);
        }

        let result = match self.resources.load(location) {
            Ok(content) => self.load_str(&content, location),
            Err(err) => Err(err),
        };
        self.loading.remove(&canonical);
        result
    }

    /// Register each definition within the given container element.
    ///
    /// The recursive core: profile gating, scoped delegate creation,
    /// pre-hook, child dispatch, post-hook. The enclosing delegate is a
    /// plain reference, so the enclosing scope is restored when this call
    /// returns.
    fn register_document(
        &mut self,
        root: Node<'_, '_>,
        resource: &str,
        parent: Option<&ParserDelegate>,
    ) {
        if let Some(profile_spec) = get_attribute(root, PROFILE_ATTRIBUTE) {
            if has_text(Some(profile_spec)) {
                let profiles = tokenize_multi_value(profile_spec);
                if !self.environment.accepts_profiles(&profiles) {
                    tracing::debug!(
                        profiles = %profile_spec,
                        resource = %resource,
                        "Skipping element: profiles not accepted"
                    );
                    return;
                }
            }
        }

        let mut delegate = ParserDelegate::new(root, parent, resource, &mut self.problems);

        self.hooks.pre_process(root);

        if delegate.is_default_namespace(root) {
            for child in element_children(root) {
                if delegate.is_default_namespace(child) {
                    self.parse_default_element(child, &mut delegate, resource);
                } else {
                    self.parse_custom_element(child, &delegate, resource);
                }
            }
        } else {
            self.parse_custom_element(root, &delegate, resource);
        }

        self.hooks.post_process(root);
    }

    fn parse_default_element(
        &mut self,
        node: Node<'_, '_>,
        delegate: &mut ParserDelegate,
        resource: &str,
    ) {
        match get_tag_name(node) {
            IMPORT_ELEMENT => self.process_import(node, resource),
            ALIAS_ELEMENT => self.process_alias(node, resource),
            DEFINITION_ELEMENT => self.process_definition(node, delegate, resource),
            DEFINITIONS_ELEMENT => self.register_document(node, resource, Some(delegate)),
            other => {
                tracing::debug!(tag = %other, "Ignoring unknown element in default namespace");
            }
        }
    }

    /// Parse an `import` element and merge its target documents into the
    /// shared registry. Every failure here abandons this import only.
    fn process_import(&mut self, node: Node<'_, '_>, resource: &str) {
        let location = get_attribute(node, RESOURCE_ATTRIBUTE).unwrap_or_default();
        if !has_text(Some(location)) {
            self.problems.report(
                "Import resource location must not be empty",
                resource,
                node,
            );
            return;
        }

        let location = match self.environment.resolve_required_placeholders(location) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.problems.report_caused(
                    "Failed to resolve placeholders in import location",
                    resource,
                    node,
                    &err,
                );
                return;
            }
        };

        let mut actual_resources = Vec::new();
        let loaded = if is_absolute_location(&location) {
            self.import_expanded(&location, node, resource, &mut actual_resources)
        } else {
            // No scheme: resolve against the current document first, fall
            // back to composing against its canonical location.
            let direct = self.resources.resolve_relative(resource, &location);
            if self.resources.exists(&direct) {
                match self.load_resource(&direct) {
                    Ok(count) => {
                        actual_resources.push(direct);
                        Some(count)
                    }
                    Err(err) => {
                        self.problems.report_caused(
                            format!(
                                "Failed to import definitions from relative location [{location}]"
                            ),
                            resource,
                            node,
                            &err,
                        );
                        None
                    }
                }
            } else {
                let base = self.resources.canonical(resource);
                let composed = apply_relative_path(&base, &location);
                self.import_expanded(&composed, node, resource, &mut actual_resources)
            }
        };

        if let Some(count) = loaded {
            tracing::debug!(
                location = %location,
                count,
                "Imported definitions"
            );
            self.fire_import_processed(ImportProcessed {
                location,
                resources: actual_resources,
            });
        }
    }

    /// Expand a location (possibly a wildcard) and load every match.
    /// Returns `None` when the import failed; the failure is already
    /// reported.
    fn import_expanded(
        &mut self,
        location: &str,
        node: Node<'_, '_>,
        resource: &str,
        actual_resources: &mut Vec<String>,
    ) -> Option<usize> {
        let expanded = match self.resources.expand(location) {
            Ok(expanded) => expanded,
            Err(err) => {
                self.problems.report_caused(
                    format!("Failed to import definitions from location [{location}]"),
                    resource,
                    node,
                    &err,
                );
                return None;
            }
        };

        let mut count = 0;
        for resolved in expanded {
            match self.load_resource(&resolved) {
                Ok(loaded) => {
                    count += loaded;
                    actual_resources.push(resolved);
                }
                Err(err) => {
                    self.problems.report_caused(
                        format!("Failed to import definitions from location [{resolved}]"),
                        resource,
                        node,
                        &err,
                    );
                    return None;
                }
            }
        }
        Some(count)
    }

    /// Process an `alias` element, registering the alias with the
    /// registry.
    fn process_alias(&mut self, node: Node<'_, '_>, resource: &str) {
        let name = get_attribute(node, NAME_ATTRIBUTE).unwrap_or_default();
        let alias = get_attribute(node, ALIAS_ATTRIBUTE).unwrap_or_default();

        let mut valid = true;
        if !has_text(Some(name)) {
            self.problems.report("Name must not be empty", resource, node);
            valid = false;
        }
        if !has_text(Some(alias)) {
            self.problems.report("Alias must not be empty", resource, node);
            valid = false;
        }
        if !valid {
            return;
        }

        match self.registry.register_alias(name, alias) {
            Ok(()) => self.fire_alias_registered(AliasRegistered {
                name: name.to_string(),
                alias: alias.to_string(),
            }),
            Err(err) => self.problems.report_caused(
                format!("Failed to register alias '{alias}' for name '{name}'"),
                resource,
                node,
                &err,
            ),
        }
    }

    /// Process a definition element: parse, decorate, register, notify.
    fn process_definition(
        &mut self,
        node: Node<'_, '_>,
        delegate: &mut ParserDelegate,
        resource: &str,
    ) {
        let Some(holder) =
            delegate.parse_definition_element(node, &self.registry, &mut self.problems)
        else {
            return;
        };

        let holder = {
            let mut ctx = NamespaceContext {
                registry: &mut self.registry,
                problems: &mut self.problems,
                resource,
            };
            delegate.decorate_if_required(node, holder, &self.namespaces, &mut ctx)
        };

        self.register_holder(holder, node, resource);
    }

    /// Route a custom (non-default-namespace) element to its namespace
    /// handler.
    fn parse_custom_element(
        &mut self,
        node: Node<'_, '_>,
        delegate: &ParserDelegate,
        resource: &str,
    ) {
        let holder = {
            let mut ctx = NamespaceContext {
                registry: &mut self.registry,
                problems: &mut self.problems,
                resource,
            };
            delegate.parse_custom_element(node, &self.namespaces, &mut ctx)
        };

        if let Some(holder) = holder {
            self.register_holder(holder, node, resource);
        }
    }

    /// Register a holder's primary name and aliases; fire the component
    /// event on success.
    fn register_holder(&mut self, holder: DefinitionHolder, node: Node<'_, '_>, resource: &str) {
        if let Err(err) = self
            .registry
            .register(holder.name.clone(), holder.definition.clone())
        {
            self.problems.report_caused(
                format!("Failed to register definition with name '{}'", holder.name),
                resource,
                node,
                &err,
            );
            return;
        }

        for alias in &holder.aliases {
            if let Err(err) = self.registry.register_alias(&holder.name, alias) {
                self.problems.report_caused(
                    format!(
                        "Failed to register alias '{alias}' for definition '{}'",
                        holder.name
                    ),
                    resource,
                    node,
                    &err,
                );
            }
        }

        tracing::debug!(name = %holder.name, "Registered definition");
        self.fire_component_registered(&holder);
    }

    fn fire_import_processed(&mut self, event: ImportProcessed) {
        for listener in &mut self.listeners {
            listener.import_processed(&event);
        }
    }

    fn fire_alias_registered(&mut self, event: AliasRegistered) {
        for listener in &mut self.listeners {
            listener.alias_registered(&event);
        }
    }

    fn fire_component_registered(&mut self, holder: &DefinitionHolder) {
        for listener in &mut self.listeners {
            listener.component_registered(holder);
        }
    }
}
