//! Core data types for definitions, the recipes registered by the loader.

use serde::{Deserialize, Serialize};

/// Autowire mode for a definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutowireMode {
    /// No autowiring; only explicit property values apply.
    #[default]
    None,
    /// Wire collaborators by property name.
    ByName,
    /// Wire collaborators by target type.
    ByType,
}

impl AutowireMode {
    /// Parse an attribute value into a mode.
    ///
    /// Returns `None` for unrecognized values so the caller can report the
    /// offending element; `"default"` is resolved by the settings scope
    /// before this is called.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" | "no" => Some(Self::None),
            "by-name" => Some(Self::ByName),
            "by-type" => Some(Self::ByType),
            _ => None,
        }
    }
}

/// A property or constructor argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Value {
    /// Literal string value.
    String(String),
    /// Reference to another definition by name.
    Ref(String),
    /// Explicit null.
    Null,
}

/// A named property value on a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Property name.
    pub name: String,
    /// The value to apply.
    pub value: Value,
}

/// A constructor argument on a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorArg {
    /// Explicit argument index, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// The argument value.
    pub value: Value,
}

/// Source position of an element within its document (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub row: u32,
    pub col: u32,
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// A named recipe describing how to construct and configure an object.
///
/// This is the unit the registry stores. Instantiation is out of scope;
/// the loader only parses and registers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Target type identifier (the `class` attribute).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Scope identifier, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Whether instantiation should be deferred.
    pub lazy_init: bool,

    /// Autowire mode, after scope-default resolution.
    pub autowire: AutowireMode,

    /// Names this definition depends on.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub depends_on: Vec<String>,

    /// Initialization callback method name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_method: Option<String>,

    /// Destruction callback method name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy_method: Option<String>,

    /// Human-readable description from the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Property values, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub properties: Vec<PropertyValue>,

    /// Constructor arguments, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub constructor_args: Vec<ConstructorArg>,

    /// Position of the defining element in its source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourcePosition>,
}

impl Definition {
    /// Create a definition with a target type.
    #[must_use]
    pub fn with_class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }
}

/// A parsed definition together with its primary name and aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionHolder {
    /// Primary registration name.
    pub name: String,
    /// Additional alias names.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub aliases: Vec<String>,
    /// The definition itself.
    pub definition: Definition,
}

impl DefinitionHolder {
    /// Create a holder with no aliases.
    #[must_use]
    pub fn new(name: impl Into<String>, definition: Definition) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            definition,
        }
    }

    /// Create a holder with aliases.
    #[must_use]
    pub fn with_aliases(
        name: impl Into<String>,
        aliases: Vec<String>,
        definition: Definition,
    ) -> Self {
        Self {
            name: name.into(),
            aliases,
            definition,
        }
    }
}
