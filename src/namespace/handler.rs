//! Namespace handler trait definition.

use roxmltree::Node;

use crate::reader::ProblemCollector;
use crate::registry::DefinitionRegistry;
use crate::types::DefinitionHolder;

/// State a namespace handler works against.
pub struct NamespaceContext<'a> {
    /// The shared registry; handlers may register supporting definitions
    /// directly.
    pub registry: &'a mut DefinitionRegistry,
    /// Problem sink for structural errors inside custom elements.
    pub problems: &'a mut ProblemCollector,
    /// Location of the document being parsed.
    pub resource: &'a str,
}

/// What triggered a decoration pass.
#[derive(Debug, Clone, Copy)]
pub enum DecorationSource<'a, 'input> {
    /// A child element in a custom namespace attached to a definition
    /// element.
    Element(Node<'a, 'input>),
    /// A namespaced attribute on a definition element.
    Attribute { name: &'a str, value: &'a str },
}

/// Handler for one custom namespace.
///
/// `parse` turns a standalone custom element into a definition holder;
/// `decorate` transforms a holder based on custom markup attached to a
/// default-grammar definition element. The default decoration is the
/// identity transform.
pub trait NamespaceHandler: Send + Sync {
    /// Parse a custom element into a definition.
    ///
    /// Returns `None` when the element contributes nothing directly (or on
    /// structural error, reported through the context). The reader
    /// registers the returned holder and fires the component event.
    fn parse(
        &self,
        node: Node<'_, '_>,
        ctx: &mut NamespaceContext<'_>,
    ) -> Option<DefinitionHolder>;

    /// Transform a definition holder based on custom markup.
    fn decorate(
        &self,
        source: DecorationSource<'_, '_>,
        holder: DefinitionHolder,
        ctx: &mut NamespaceContext<'_>,
    ) -> DefinitionHolder {
        let _ = (source, ctx);
        holder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Definition;
    use roxmltree::Document;

    struct FixedHandler;

    impl NamespaceHandler for FixedHandler {
        fn parse(
            &self,
            _node: Node<'_, '_>,
            _ctx: &mut NamespaceContext<'_>,
        ) -> Option<DefinitionHolder> {
            Some(DefinitionHolder::new("fixed", Definition::default()))
        }
    }

    #[test]
    fn test_default_decorate_is_identity() {
        let handler = FixedHandler;
        let xml = r#"<x:custom xmlns:x="https://example.org/x"/>"#;
        let doc = Document::parse(xml).unwrap();

        let mut registry = DefinitionRegistry::new();
        let mut problems = ProblemCollector::new();
        let mut ctx = NamespaceContext {
            registry: &mut registry,
            problems: &mut problems,
            resource: "test.xml",
        };

        let holder = DefinitionHolder::new("svc", Definition::default());
        let decorated = handler.decorate(
            DecorationSource::Element(doc.root_element()),
            holder.clone(),
            &mut ctx,
        );
        assert_eq!(decorated, holder);
    }
}
