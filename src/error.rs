//! Error types for the loader.
//!
//! Uses the dual-error pattern: `LoaderError` for hard failures (setup,
//! I/O, registry conflicts surfaced to callers), while recoverable
//! per-element faults are accumulated as [`crate::reader::Problem`]s and
//! never abort a document pass.

use thiserror::Error;

/// Main error type for the wirecfg library.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A resource location could not be resolved to an existing resource.
    #[error("Resource not found: {location}")]
    ResourceNotFound { location: String },

    /// A `${...}` placeholder had no value in the environment.
    #[error("Could not resolve placeholder '{placeholder}' in '{value}'")]
    UnresolvedPlaceholder { placeholder: String, value: String },

    /// A definition name is already registered and overriding is disallowed.
    #[error("Definition with name '{name}' is already registered and overriding is disabled")]
    DuplicateDefinition { name: String },

    /// An alias is already bound to a different definition name.
    #[error("Cannot register alias '{alias}' for name '{name}': it is already bound to '{existing}'")]
    AliasConflict {
        alias: String,
        name: String,
        existing: String,
    },

    /// Registering the alias would create a resolution cycle.
    #[error("Cannot register alias '{alias}' for name '{name}': circular reference")]
    AliasCycle { alias: String, name: String },

    /// No namespace handler is registered for a namespace URI.
    #[error("No namespace handler registered for namespace [{namespace}]")]
    NoHandler { namespace: String },

    /// Invalid wildcard pattern in an import location.
    #[error("Invalid location pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// YAML serialization error (CLI registry dumps).
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// One or more problems were reported while loading in strict mode.
    #[error("Loading completed with {count} problem(s)")]
    ProblemsReported { count: usize },
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoaderError::ResourceNotFound {
            location: "conf/app.xml".to_string(),
        };
        assert!(err.to_string().contains("conf/app.xml"));
    }

    #[test]
    fn test_alias_conflict_display() {
        let err = LoaderError::AliasConflict {
            alias: "y".to_string(),
            name: "z".to_string(),
            existing: "x".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot register alias 'y' for name 'z': it is already bound to 'x'"
        );
    }

    #[test]
    fn test_unresolved_placeholder_display() {
        let err = LoaderError::UnresolvedPlaceholder {
            placeholder: "env".to_string(),
            value: "conf/${env}.xml".to_string(),
        };
        assert!(err.to_string().contains("'env'"));
        assert!(err.to_string().contains("conf/${env}.xml"));
    }
}
