//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::{Node, TextPos};

use crate::config::DEFAULT_NAMESPACE_URI;

/// Get the tag name without namespace prefix.
///
/// # Arguments
/// * `node` - XML node
///
/// # Returns
/// Tag name without namespace (e.g., "definition" not "{ns}definition")
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use wirecfg::xml::get_tag_name;
///
/// let xml = r#"<definitions><definition/></definitions>"#;
/// let doc = Document::parse(xml).unwrap();
/// let child = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(child), "definition");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get the namespace URI of an element, if any.
///
/// # Arguments
/// * `node` - XML node
///
/// # Returns
/// Namespace URI, or `None` for unqualified elements
pub fn namespace_uri<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.tag_name().namespace()
}

/// Check whether an element belongs to the default wiring grammar.
///
/// Elements with no namespace at all count as default: plain unqualified
/// documents are the common case.
///
/// # Arguments
/// * `node` - XML node
///
/// # Returns
/// `true` for the wiring namespace or no namespace
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use wirecfg::xml::is_default_namespace;
///
/// let xml = r#"<definitions xmlns:tx="https://example.org/tx"><tx:advice/></definitions>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
/// assert!(is_default_namespace(root));
/// let advice = root.first_element_child().unwrap();
/// assert!(!is_default_namespace(advice));
/// ```
#[must_use]
pub fn is_default_namespace(node: Node<'_, '_>) -> bool {
    matches!(namespace_uri(node), None | Some(DEFAULT_NAMESPACE_URI))
}

/// Find the first child element with the given tag name.
///
/// # Arguments
/// * `node` - Parent node to search in
/// * `tag` - Tag name to search for
///
/// # Returns
/// First matching child element, or `None` if not found
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Get all element children of a node, in document order.
///
/// # Arguments
/// * `node` - Parent node
///
/// # Returns
/// Iterator over element children, skipping text and comments
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the text content of a node, trimmed.
///
/// # Arguments
/// * `node` - Node to get text from
///
/// # Returns
/// Trimmed text content, or empty string if no text
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get an attribute value from a node.
///
/// Only looks at attributes without a namespace; namespaced attributes are
/// the custom-decoration extension point and handled separately.
///
/// # Arguments
/// * `node` - Node to get attribute from
/// * `name` - Attribute name
///
/// # Returns
/// Attribute value, or `None` if not present
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Check if a node is an element with a specific tag name.
///
/// # Arguments
/// * `node` - Node to check
/// * `tag` - Expected tag name
///
/// # Returns
/// `true` if the node is an element named `tag`
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Resolve the line/column position of a node within its document.
///
/// Used to attach source positions to problems and definitions.
///
/// # Arguments
/// * `node` - Node to locate
///
/// # Returns
/// 1-based line/column position of the node's start tag
#[must_use]
pub fn text_pos(node: Node<'_, '_>) -> TextPos {
    node.document().text_pos_at(node.range().start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name() {
        let xml = r#"<definitions><definition/></definitions>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "definitions");
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:definitions xmlns:ns="https://wirecfg.dev/schema/wiring"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "definitions");
    }

    #[test]
    fn test_namespace_uri() {
        let xml = r#"<root xmlns:tx="https://example.org/tx"><tx:advice/><plain/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        let advice = find_child(root, "advice").unwrap();
        assert_eq!(namespace_uri(advice), Some("https://example.org/tx"));

        let plain = find_child(root, "plain").unwrap();
        assert_eq!(namespace_uri(plain), None);
    }

    #[test]
    fn test_is_default_namespace() {
        let xml = format!(
            r#"<definitions xmlns="{DEFAULT_NAMESPACE_URI}" xmlns:x="https://example.org/x">
                <definition/>
                <x:custom/>
            </definitions>"#
        );
        let doc = Document::parse(&xml).unwrap();
        let root = doc.root_element();

        assert!(is_default_namespace(root));
        assert!(is_default_namespace(find_child(root, "definition").unwrap()));
        assert!(!is_default_namespace(find_child(root, "custom").unwrap()));
    }

    #[test]
    fn test_is_default_namespace_unqualified() {
        let xml = r#"<definitions><definition/></definitions>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(is_default_namespace(doc.root_element()));
    }

    #[test]
    fn test_find_child() {
        let xml = r#"<root><a/><b/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(find_child(root, "a").is_some());
        assert!(find_child(root, "c").is_none());
    }

    #[test]
    fn test_element_children_skips_text_and_comments() {
        let xml = r#"<root>text<a/><!-- comment --><b/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let children: Vec<_> = element_children(doc.root_element()).collect();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_get_text() {
        let xml = r#"<root>  trimmed  </root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_text(doc.root_element()), "trimmed");
    }

    #[test]
    fn test_get_attribute() {
        let xml = r#"<root attr="value"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_attribute(doc.root_element(), "attr"), Some("value"));
        assert_eq!(get_attribute(doc.root_element(), "missing"), None);
    }

    #[test]
    fn test_text_pos() {
        let xml = "<root>\n  <child/>\n</root>";
        let doc = Document::parse(xml).unwrap();
        let child = find_child(doc.root_element(), "child").unwrap();
        let pos = text_pos(child);
        assert_eq!(pos.row, 2);
    }
}
