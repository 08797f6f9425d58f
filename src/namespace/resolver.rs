//! Namespace-URI-to-handler mapping.

use std::collections::HashMap;

use super::handler::NamespaceHandler;

/// Registry mapping namespace URIs to handlers.
///
/// Looked up at dispatch time by the document reader; an unmapped URI is a
/// reported problem, not a panic.
#[derive(Default)]
pub struct NamespaceHandlerResolver {
    handlers: HashMap<String, Box<dyn NamespaceHandler>>,
}

impl NamespaceHandlerResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a namespace URI.
    pub fn register(&mut self, uri: impl Into<String>, handler: impl NamespaceHandler + 'static) {
        self.handlers.insert(uri.into(), Box::new(handler));
    }

    /// Resolve the handler for a namespace URI.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<&dyn NamespaceHandler> {
        self.handlers.get(uri).map(|h| h.as_ref())
    }

    /// Whether a handler is registered for a URI.
    #[must_use]
    pub fn has_handler(&self, uri: &str) -> bool {
        self.handlers.contains_key(uri)
    }

    /// All registered namespace URIs.
    #[must_use]
    pub fn registered_uris(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::NamespaceContext;
    use crate::types::{Definition, DefinitionHolder};
    use roxmltree::Node;

    struct DummyHandler;

    impl NamespaceHandler for DummyHandler {
        fn parse(
            &self,
            _node: Node<'_, '_>,
            _ctx: &mut NamespaceContext<'_>,
        ) -> Option<DefinitionHolder> {
            Some(DefinitionHolder::new("dummy", Definition::default()))
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut resolver = NamespaceHandlerResolver::new();
        resolver.register("https://example.org/tx", DummyHandler);

        assert!(resolver.has_handler("https://example.org/tx"));
        assert!(resolver.resolve("https://example.org/tx").is_some());
        assert!(resolver.resolve("https://example.org/other").is_none());
    }

    #[test]
    fn test_registered_uris() {
        let mut resolver = NamespaceHandlerResolver::new();
        resolver.register("https://example.org/a", DummyHandler);
        resolver.register("https://example.org/b", DummyHandler);

        let mut uris = resolver.registered_uris();
        uris.sort_unstable();
        assert_eq!(uris, vec!["https://example.org/a", "https://example.org/b"]);
    }
}
