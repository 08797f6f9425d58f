//! Grammar constants and tokenizing helpers for the wiring document format.

/// Namespace URI of the default (built-in) document grammar.
///
/// Elements with no namespace at all are also treated as belonging to the
/// default grammar, so plain unqualified documents keep working.
pub const DEFAULT_NAMESPACE_URI: &str = "https://wirecfg.dev/schema/wiring";

/// Root container element; also valid nested for scoped defaults.
pub const DEFINITIONS_ELEMENT: &str = "definitions";

/// Single definition element.
pub const DEFINITION_ELEMENT: &str = "definition";

/// Import element, merging another document into the same registry.
pub const IMPORT_ELEMENT: &str = "import";

/// Alias element.
pub const ALIAS_ELEMENT: &str = "alias";

/// Attribute carrying the profile expression list on a container element.
pub const PROFILE_ATTRIBUTE: &str = "profile";

/// Attribute carrying the import location.
pub const RESOURCE_ATTRIBUTE: &str = "resource";

/// Attribute carrying the target name of an alias element.
pub const NAME_ATTRIBUTE: &str = "name";

/// Attribute carrying the alias value of an alias element.
pub const ALIAS_ATTRIBUTE: &str = "alias";

/// Delimiters accepted in multi-value attributes (profiles, names,
/// depends-on lists).
pub const MULTI_VALUE_DELIMITERS: &[char] = &[',', ';', ' ', '\t', '\n', '\r'];

/// Attribute value meaning "inherit from the enclosing scope".
pub const DEFAULT_VALUE: &str = "default";

/// Separator used when generating names for anonymous definitions.
pub const GENERATED_NAME_SEPARATOR: &str = "#";

/// Split a multi-value attribute into its non-empty tokens.
///
/// Accepts commas, semicolons and whitespace as delimiters, matching the
/// profile and name list syntax.
///
/// # Examples
/// ```
/// use wirecfg::config::tokenize_multi_value;
///
/// assert_eq!(tokenize_multi_value("a,b; c"), vec!["a", "b", "c"]);
/// assert!(tokenize_multi_value("  ").is_empty());
/// ```
#[must_use]
pub fn tokenize_multi_value(value: &str) -> Vec<&str> {
    value
        .split(MULTI_VALUE_DELIMITERS)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Check whether an attribute value carries actual text.
///
/// Missing attributes and whitespace-only values are both treated as unset.
#[must_use]
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
