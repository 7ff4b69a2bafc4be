//! Read-only tree/query interface over parsed markup.

use dom_query::{Document, NodeRef, Selection};

/// Read-only navigation over one element of a parsed page.
///
/// Only the capabilities the extractor and classifier need: attribute and
/// text access, CSS queries below the node, and upward/sideways navigation.
pub trait MarkupNode: Clone {
    /// Lowercase tag name, `None` for non-element nodes.
    fn tag_name(&self) -> Option<String>;

    fn attr(&self, name: &str) -> Option<String>;

    /// Visible text of the subtree, text nodes joined by single spaces.
    fn text(&self) -> String;

    fn parent(&self) -> Option<Self>;

    /// Following element siblings, nearest first.
    fn next_element_siblings(&self) -> Vec<Self>;

    /// Descendants matching a CSS selector, in document order.
    fn select_all(&self, selector: &str) -> Vec<Self>;

    fn select_first(&self, selector: &str) -> Option<Self> {
        self.select_all(selector).into_iter().next()
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Nearest ancestor (excluding self) with the given tag name.
    fn closest(&self, tag: &str) -> Option<Self> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.tag_name().as_deref() == Some(tag) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }
}

/// [`MarkupNode`] backed by a `dom_query` element.
#[derive(Clone)]
pub struct DomNode<'a> {
    node: NodeRef<'a>,
}

impl std::fmt::Debug for DomNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomNode")
            .field("tag", &self.tag_name())
            .finish()
    }
}

impl<'a> DomNode<'a> {
    /// The `<html>` element of a parsed document.
    ///
    /// The HTML parser always synthesizes one, so `None` only happens for
    /// documents built from fragments.
    pub fn root(doc: &'a Document) -> Option<Self> {
        doc.select("html")
            .nodes()
            .first()
            .map(|node| DomNode { node: *node })
    }

    fn selection(&self) -> Selection<'a> {
        Selection::from(self.node)
    }

    fn collect_text(node: &NodeRef<'a>, parts: &mut Vec<String>) {
        for child in node.children() {
            if child.is_text() {
                let text = child.text();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            } else if child.is_element() {
                let name = child.node_name();
                if matches!(name.as_deref(), Some("script") | Some("style")) {
                    continue;
                }
                Self::collect_text(&child, parts);
            }
        }
    }
}

impl<'a> MarkupNode for DomNode<'a> {
    fn tag_name(&self) -> Option<String> {
        self.node
            .node_name()
            .map(|name| name.to_string().to_lowercase())
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.selection().attr(name).map(|v| v.to_string())
    }

    fn text(&self) -> String {
        let mut parts = Vec::new();
        Self::collect_text(&self.node, &mut parts);
        parts.join(" ")
    }

    fn parent(&self) -> Option<Self> {
        self.node
            .parent()
            .filter(|p| p.is_element())
            .map(|node| DomNode { node })
    }

    fn next_element_siblings(&self) -> Vec<Self> {
        let mut siblings = Vec::new();
        let mut current = self.node.next_sibling();
        while let Some(node) = current {
            if node.is_element() {
                siblings.push(DomNode { node });
            }
            current = node.next_sibling();
        }
        siblings
    }

    fn select_all(&self, selector: &str) -> Vec<Self> {
        self.selection()
            .select(selector)
            .nodes()
            .iter()
            .map(|node| DomNode { node: *node })
            .collect()
    }
}
