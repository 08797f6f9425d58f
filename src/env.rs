//! Environment collaborator: active profiles and placeholder resolution.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LoaderError, Result};

/// `${...}` placeholder pattern.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

/// Active-profile set plus a property source for placeholder resolution.
///
/// # Examples
/// ```
/// use wirecfg::env::Environment;
///
/// let env = Environment::new()
///     .with_active_profile("prod")
///     .with_property("conf.dir", "conf");
///
/// assert!(env.accepts_profiles(&["prod"]));
/// assert!(!env.accepts_profiles(&["dev"]));
/// assert_eq!(
///     env.resolve_required_placeholders("${conf.dir}/app.xml").unwrap(),
///     "conf/app.xml"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Environment {
    active_profiles: HashSet<String>,
    properties: HashMap<String, String>,
}

impl Environment {
    /// Create an environment with no active profiles and no properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active profile.
    #[must_use]
    pub fn with_active_profile(mut self, profile: impl Into<String>) -> Self {
        self.active_profiles.insert(profile.into());
        self
    }

    /// Add a property for placeholder resolution.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Activate a profile on an existing environment.
    pub fn add_active_profile(&mut self, profile: impl Into<String>) {
        self.active_profiles.insert(profile.into());
    }

    /// Set a property on an existing environment.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// The currently active profiles.
    #[must_use]
    pub fn active_profiles(&self) -> &HashSet<String> {
        &self.active_profiles
    }

    /// Evaluate a list of profile expressions against the active set.
    ///
    /// Expressions are OR-ed: the list is accepted when any single
    /// expression matches. A leading `!` negates an expression. An empty
    /// list is accepted (no filter).
    #[must_use]
    pub fn accepts_profiles(&self, profiles: &[&str]) -> bool {
        if profiles.is_empty() {
            return true;
        }
        profiles.iter().any(|expr| {
            if let Some(negated) = expr.strip_prefix('!') {
                !self.active_profiles.contains(negated)
            } else {
                self.active_profiles.contains(*expr)
            }
        })
    }

    /// Replace every `${key}` placeholder in `value` with its property.
    ///
    /// # Errors
    /// Returns [`LoaderError::UnresolvedPlaceholder`] for the first
    /// placeholder with no matching property. The input is returned
    /// unchanged when it contains no placeholders.
    pub fn resolve_required_placeholders(&self, value: &str) -> Result<String> {
        let mut result = String::with_capacity(value.len());
        let mut last = 0;

        for caps in PLACEHOLDER_PATTERN.captures_iter(value) {
            let whole = caps
                .get(0)
                .ok_or_else(|| LoaderError::UnresolvedPlaceholder {
                    placeholder: String::new(),
                    value: value.to_string(),
                })?;
            let key = &caps[1];
            let replacement =
                self.properties
                    .get(key)
                    .ok_or_else(|| LoaderError::UnresolvedPlaceholder {
                        placeholder: key.to_string(),
                        value: value.to_string(),
                    })?;

            result.push_str(&value[last..whole.start()]);
            result.push_str(replacement);
            last = whole.end();
        }

        result.push_str(&value[last..]);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_profiles_empty_list() {
        let env = Environment::new();
        assert!(env.accepts_profiles(&[]));
    }

    #[test]
    fn test_accepts_profiles_match() {
        let env = Environment::new().with_active_profile("prod");
        assert!(env.accepts_profiles(&["prod"]));
        assert!(env.accepts_profiles(&["dev", "prod"]));
        assert!(!env.accepts_profiles(&["dev", "test"]));
    }

    #[test]
    fn test_accepts_profiles_negation() {
        let env = Environment::new().with_active_profile("prod");
        assert!(!env.accepts_profiles(&["!prod"]));
        assert!(env.accepts_profiles(&["!dev"]));
    }

    #[test]
    fn test_accepts_profiles_no_active() {
        let env = Environment::new();
        assert!(!env.accepts_profiles(&["prod"]));
        assert!(env.accepts_profiles(&["!prod"]));
    }

    #[test]
    fn test_resolve_placeholders() {
        let env = Environment::new()
            .with_property("env", "prod")
            .with_property("dir", "conf");

        assert_eq!(
            env.resolve_required_placeholders("${dir}/${env}.xml").unwrap(),
            "conf/prod.xml"
        );
    }

    #[test]
    fn test_resolve_no_placeholders() {
        let env = Environment::new();
        assert_eq!(
            env.resolve_required_placeholders("plain.xml").unwrap(),
            "plain.xml"
        );
    }

    #[test]
    fn test_resolve_unresolvable_placeholder() {
        let env = Environment::new();
        let err = env
            .resolve_required_placeholders("conf/${missing}.xml")
            .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "missing"
        ));
    }
}
