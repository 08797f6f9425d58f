//! Per-scope parser delegate: inheritable defaults and the definition
//! element grammar.

use std::collections::HashSet;

use roxmltree::Node;

use crate::config::{has_text, tokenize_multi_value, DEFAULT_VALUE, GENERATED_NAME_SEPARATOR};
use crate::namespace::{DecorationSource, NamespaceContext, NamespaceHandlerResolver};
use crate::reader::problems::ProblemCollector;
use crate::registry::DefinitionRegistry;
use crate::types::{
    AutowireMode, ConstructorArg, Definition, DefinitionHolder, PropertyValue, SourcePosition,
    Value,
};
use crate::xml::{element_children, get_attribute, get_tag_name, is_default_namespace, text_pos};

// Definition element grammar.
const ID_ATTRIBUTE: &str = "id";
const NAME_ATTRIBUTE: &str = "name";
const CLASS_ATTRIBUTE: &str = "class";
const SCOPE_ATTRIBUTE: &str = "scope";
const LAZY_INIT_ATTRIBUTE: &str = "lazy-init";
const AUTOWIRE_ATTRIBUTE: &str = "autowire";
const DEPENDS_ON_ATTRIBUTE: &str = "depends-on";
const INIT_METHOD_ATTRIBUTE: &str = "init-method";
const DESTROY_METHOD_ATTRIBUTE: &str = "destroy-method";
const INDEX_ATTRIBUTE: &str = "index";
const VALUE_ATTRIBUTE: &str = "value";
const REF_ATTRIBUTE: &str = "ref";

const DESCRIPTION_ELEMENT: &str = "description";
const PROPERTY_ELEMENT: &str = "property";
const CONSTRUCTOR_ARG_ELEMENT: &str = "constructor-arg";
const VALUE_ELEMENT: &str = "value";
const REF_ELEMENT: &str = "ref";
const NULL_ELEMENT: &str = "null";

// Container-level default attributes.
const DEFAULT_LAZY_INIT_ATTRIBUTE: &str = "default-lazy-init";
const DEFAULT_AUTOWIRE_ATTRIBUTE: &str = "default-autowire";
const DEFAULT_INIT_METHOD_ATTRIBUTE: &str = "default-init-method";
const DEFAULT_DESTROY_METHOD_ATTRIBUTE: &str = "default-destroy-method";

const TRUE_VALUE: &str = "true";

/// Effective default attribute values for one container scope.
///
/// Attributes left unset (or set to `"default"`) fall back to the parent
/// scope's values; the top level falls back to hard defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDefaults {
    /// Default for `lazy-init`.
    pub lazy_init: bool,
    /// Default for `autowire`.
    pub autowire: AutowireMode,
    /// Default for `init-method`.
    pub init_method: Option<String>,
    /// Default for `destroy-method`.
    pub destroy_method: Option<String>,
}

/// Stateful delegate for parsing definition elements within one container
/// scope.
///
/// Holds the scope's effective defaults, tracks name uniqueness within the
/// scope, and numbers anonymous definitions. A new delegate is created on
/// entering each nested container, chained to the enclosing one for
/// default fallback; the enclosing delegate is restored by the caller when
/// the recursive call returns.
pub struct ParserDelegate {
    defaults: DocumentDefaults,
    resource: String,
    used_names: HashSet<String>,
    anonymous_counter: usize,
}

impl ParserDelegate {
    /// Create a delegate for a container element, inheriting unset
    /// defaults from the enclosing delegate.
    pub fn new(
        scope: Node<'_, '_>,
        parent: Option<&ParserDelegate>,
        resource: &str,
        problems: &mut ProblemCollector,
    ) -> Self {
        let defaults = Self::init_defaults(scope, parent.map(|p| &p.defaults), resource, problems);
        Self {
            defaults,
            resource: resource.to_string(),
            used_names: HashSet::new(),
            anonymous_counter: 0,
        }
    }

    /// The scope's effective defaults.
    #[must_use]
    pub fn defaults(&self) -> &DocumentDefaults {
        &self.defaults
    }

    fn init_defaults(
        scope: Node<'_, '_>,
        parent: Option<&DocumentDefaults>,
        resource: &str,
        problems: &mut ProblemCollector,
    ) -> DocumentDefaults {
        let fallback = parent.cloned().unwrap_or_default();

        let lazy_init = match get_attribute(scope, DEFAULT_LAZY_INIT_ATTRIBUTE) {
            Some(value) if value != DEFAULT_VALUE => value == TRUE_VALUE,
            _ => fallback.lazy_init,
        };

        let autowire = match get_attribute(scope, DEFAULT_AUTOWIRE_ATTRIBUTE) {
            Some(value) if value != DEFAULT_VALUE => match AutowireMode::parse(value) {
                Some(mode) => mode,
                None => {
                    problems.report(
                        format!("Invalid default-autowire value '{value}'"),
                        resource,
                        scope,
                    );
                    fallback.autowire
                }
            },
            _ => fallback.autowire,
        };

        let init_method = get_attribute(scope, DEFAULT_INIT_METHOD_ATTRIBUTE)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .or(fallback.init_method);

        let destroy_method = get_attribute(scope, DEFAULT_DESTROY_METHOD_ATTRIBUTE)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .or(fallback.destroy_method);

        DocumentDefaults {
            lazy_init,
            autowire,
            init_method,
            destroy_method,
        }
    }

    /// Whether the element belongs to the default grammar.
    #[must_use]
    pub fn is_default_namespace(&self, node: Node<'_, '_>) -> bool {
        is_default_namespace(node)
    }

    /// Parse one definition element into a name/aliases/definition holder.
    ///
    /// Returns `None` on unrecoverable structural errors, which are
    /// reported through the collector before returning.
    pub fn parse_definition_element(
        &mut self,
        node: Node<'_, '_>,
        registry: &DefinitionRegistry,
        problems: &mut ProblemCollector,
    ) -> Option<DefinitionHolder> {
        let id = get_attribute(node, ID_ATTRIBUTE).filter(|v| !v.trim().is_empty());
        let name_tokens: Vec<&str> = get_attribute(node, NAME_ATTRIBUTE)
            .map(tokenize_multi_value)
            .unwrap_or_default();

        let mut aliases: Vec<String> = name_tokens.iter().map(|s| s.to_string()).collect();
        let name = match id {
            Some(id) => id.to_string(),
            None if !aliases.is_empty() => aliases.remove(0),
            None => String::new(),
        };

        let definition = self.parse_definition_attributes(node, problems)?;

        let name = if name.is_empty() {
            match &definition.class_name {
                Some(class) => self.generate_name(class, registry),
                None => {
                    problems.report(
                        "Anonymous definition must specify a 'class' attribute",
                        &self.resource,
                        node,
                    );
                    return None;
                }
            }
        } else {
            name
        };

        if !self.check_name_uniqueness(&name, &aliases) {
            problems.report(
                format!("Definition name '{name}' is already used in this <definitions> element"),
                &self.resource,
                node,
            );
            return None;
        }

        Some(DefinitionHolder::with_aliases(name, aliases, definition))
    }

    /// Generate a unique name for an anonymous definition.
    ///
    /// Candidates already taken in the registry (as a name or alias) are
    /// skipped, so anonymous definitions stay distinct across nested
    /// scopes and imported documents sharing one registry.
    fn generate_name(&mut self, class: &str, registry: &DefinitionRegistry) -> String {
        loop {
            let candidate = format!(
                "{class}{GENERATED_NAME_SEPARATOR}{}",
                self.anonymous_counter
            );
            self.anonymous_counter += 1;
            if !self.used_names.contains(&candidate)
                && !registry.contains(&candidate)
                && !registry.is_alias(&candidate)
            {
                return candidate;
            }
        }
    }

    fn check_name_uniqueness(&mut self, name: &str, aliases: &[String]) -> bool {
        if self.used_names.contains(name) || aliases.iter().any(|a| self.used_names.contains(a)) {
            return false;
        }
        self.used_names.insert(name.to_string());
        self.used_names.extend(aliases.iter().cloned());
        true
    }

    fn parse_definition_attributes(
        &self,
        node: Node<'_, '_>,
        problems: &mut ProblemCollector,
    ) -> Option<Definition> {
        let mut definition = Definition {
            class_name: get_attribute(node, CLASS_ATTRIBUTE)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string),
            scope: get_attribute(node, SCOPE_ATTRIBUTE).map(str::to_string),
            ..Definition::default()
        };

        definition.lazy_init = match get_attribute(node, LAZY_INIT_ATTRIBUTE) {
            Some(value) if value != DEFAULT_VALUE => value == TRUE_VALUE,
            _ => self.defaults.lazy_init,
        };

        definition.autowire = match get_attribute(node, AUTOWIRE_ATTRIBUTE) {
            Some(value) if value != DEFAULT_VALUE => match AutowireMode::parse(value) {
                Some(mode) => mode,
                None => {
                    problems.report(
                        format!("Invalid autowire value '{value}'"),
                        &self.resource,
                        node,
                    );
                    return None;
                }
            },
            _ => self.defaults.autowire,
        };

        definition.depends_on = get_attribute(node, DEPENDS_ON_ATTRIBUTE)
            .map(|v| tokenize_multi_value(v).iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        definition.init_method = get_attribute(node, INIT_METHOD_ATTRIBUTE)
            .map(str::to_string)
            .or_else(|| self.defaults.init_method.clone());
        definition.destroy_method = get_attribute(node, DESTROY_METHOD_ATTRIBUTE)
            .map(str::to_string)
            .or_else(|| self.defaults.destroy_method.clone());

        let pos = text_pos(node);
        definition.source = Some(SourcePosition {
            row: pos.row,
            col: pos.col,
        });

        self.parse_definition_children(node, &mut definition, problems);
        Some(definition)
    }

    fn parse_definition_children(
        &self,
        node: Node<'_, '_>,
        definition: &mut Definition,
        problems: &mut ProblemCollector,
    ) {
        for child in element_children(node) {
            // Custom-namespace children are decoration, handled separately.
            if !is_default_namespace(child) {
                continue;
            }
            match get_tag_name(child) {
                DESCRIPTION_ELEMENT => {
                    let text = crate::xml::get_text(child);
                    if !text.is_empty() {
                        definition.description = Some(text);
                    }
                }
                PROPERTY_ELEMENT => self.parse_property_element(child, definition, problems),
                CONSTRUCTOR_ARG_ELEMENT => {
                    self.parse_constructor_arg_element(child, definition, problems);
                }
                other => {
                    tracing::debug!(tag = %other, "Ignoring unknown definition child element");
                }
            }
        }
    }

    fn parse_property_element(
        &self,
        node: Node<'_, '_>,
        definition: &mut Definition,
        problems: &mut ProblemCollector,
    ) {
        let Some(name) = get_attribute(node, NAME_ATTRIBUTE).filter(|v| !v.trim().is_empty())
        else {
            problems.report(
                "Property element must specify a 'name' attribute",
                &self.resource,
                node,
            );
            return;
        };

        if definition.properties.iter().any(|p| p.name == name) {
            problems.report(
                format!("Multiple 'property' definitions for property '{name}'"),
                &self.resource,
                node,
            );
            return;
        }

        if let Some(value) = self.parse_value(node, problems) {
            definition.properties.push(PropertyValue {
                name: name.to_string(),
                value,
            });
        }
    }

    fn parse_constructor_arg_element(
        &self,
        node: Node<'_, '_>,
        definition: &mut Definition,
        problems: &mut ProblemCollector,
    ) {
        let index = match get_attribute(node, INDEX_ATTRIBUTE) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(idx) => Some(idx),
                Err(_) => {
                    problems.report(
                        format!("Invalid constructor-arg index '{raw}'"),
                        &self.resource,
                        node,
                    );
                    return;
                }
            },
            None => None,
        };

        if let Some(value) = self.parse_value(node, problems) {
            definition.constructor_args.push(ConstructorArg { index, value });
        }
    }

    /// Parse a value from a property or constructor-arg element: either a
    /// `value`/`ref` attribute or a single `value`/`ref`/`null` child.
    fn parse_value(&self, node: Node<'_, '_>, problems: &mut ProblemCollector) -> Option<Value> {
        let value_attr = get_attribute(node, VALUE_ATTRIBUTE);
        let ref_attr = get_attribute(node, REF_ATTRIBUTE);

        if value_attr.is_some() && ref_attr.is_some() {
            problems.report(
                "Element is only allowed to contain either 'ref' or 'value'",
                &self.resource,
                node,
            );
            return None;
        }
        if let Some(value) = value_attr {
            return Some(Value::String(value.to_string()));
        }
        if let Some(target) = ref_attr {
            if target.trim().is_empty() {
                problems.report("'ref' attribute must not be empty", &self.resource, node);
                return None;
            }
            return Some(Value::Ref(target.to_string()));
        }

        for child in element_children(node) {
            match get_tag_name(child) {
                VALUE_ELEMENT => {
                    return Some(Value::String(crate::xml::get_text(child)));
                }
                REF_ELEMENT => {
                    let target = get_attribute(child, NAME_ATTRIBUTE).unwrap_or_default();
                    if target.trim().is_empty() {
                        problems.report(
                            "<ref> element must specify a 'name' attribute",
                            &self.resource,
                            child,
                        );
                        return None;
                    }
                    return Some(Value::Ref(target.to_string()));
                }
                NULL_ELEMENT => return Some(Value::Null),
                _ => {}
            }
        }

        problems.report(
            "Element must specify a ref or value",
            &self.resource,
            node,
        );
        None
    }

    /// Apply custom-namespace decoration from namespaced attributes and
    /// child elements attached to a definition element.
    ///
    /// Identity transform when nothing applies. A namespace with no
    /// registered handler is reported and skipped.
    pub fn decorate_if_required(
        &self,
        node: Node<'_, '_>,
        holder: DefinitionHolder,
        resolver: &NamespaceHandlerResolver,
        ctx: &mut NamespaceContext<'_>,
    ) -> DefinitionHolder {
        let mut decorated = holder;

        for attr in node.attributes() {
            let Some(uri) = attr.namespace() else { continue };
            if uri == crate::config::DEFAULT_NAMESPACE_URI {
                continue;
            }
            match resolver.resolve(uri) {
                Some(handler) => {
                    decorated = handler.decorate(
                        DecorationSource::Attribute {
                            name: attr.name(),
                            value: attr.value(),
                        },
                        decorated,
                        ctx,
                    );
                }
                None => ctx.problems.report(
                    format!("No namespace handler registered for namespace [{uri}]"),
                    &self.resource,
                    node,
                ),
            }
        }

        for child in element_children(node) {
            if self.is_default_namespace(child) {
                continue;
            }
            let Some(uri) = crate::xml::namespace_uri(child) else {
                continue;
            };
            match resolver.resolve(uri) {
                Some(handler) => {
                    decorated = handler.decorate(DecorationSource::Element(child), decorated, ctx);
                }
                None => ctx.problems.report(
                    format!("No namespace handler registered for namespace [{uri}]"),
                    &self.resource,
                    child,
                ),
            }
        }

        decorated
    }

    /// Parse a custom (non-default-namespace) element by dispatching to
    /// its registered namespace handler.
    pub fn parse_custom_element(
        &self,
        node: Node<'_, '_>,
        resolver: &NamespaceHandlerResolver,
        ctx: &mut NamespaceContext<'_>,
    ) -> Option<DefinitionHolder> {
        let Some(uri) = crate::xml::namespace_uri(node) else {
            ctx.problems.report(
                format!(
                    "Element <{}> is not in any namespace and not part of the default grammar",
                    get_tag_name(node)
                ),
                &self.resource,
                node,
            );
            return None;
        };

        match resolver.resolve(uri) {
            Some(handler) => handler.parse(node, ctx),
            None => {
                ctx.problems.report(
                    format!("No namespace handler registered for namespace [{uri}]"),
                    &self.resource,
                    node,
                );
                None
            }
        }
    }
}
