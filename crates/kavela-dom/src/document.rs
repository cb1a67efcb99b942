//! Arena-backed element tree.
//!
//! Nodes live in one contiguous `Vec` and are addressed by compact
//! [`NodeId`]s. Node 0 is always the root element. Nodes are never removed,
//! so an id handed out by a document stays valid for its whole lifetime.

use std::iter;

use crate::element::Element;
use crate::error::{DomError, Result};
use crate::geometry::Rect;

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root element of every document.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Border box in document coordinates, filled in by layout.
    rect: Rect,
}

/// Result of a visitor callback in [`Document::walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not descend into the current node's children.
    SkipChildren,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Element::new("body"))
    }
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            nodes: vec![Node {
                element: root,
                parent: None,
                children: Vec::new(),
                rect: Rect::default(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Append `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(DomError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
            rect: Rect::default(),
        });
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.index()).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// `id` followed by each of its ancestors up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.contains(id).then_some(id);
        iter::successors(start, move |current| self.parent(*current))
    }

    /// Nearest inclusive ancestor whose element satisfies `pred`.
    pub fn closest(&self, id: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.ancestors(id)
            .find(|candidate| self.get(*candidate).is_some_and(&pred))
    }

    /// Strict descendants of `scope` in document (pre-)order.
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(scope).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Strict descendants of `scope` matching `pred`, in document order.
    pub fn query_all(&self, scope: NodeId, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|id| self.get(*id).is_some_and(&pred))
            .collect()
    }

    /// First element in document order carrying `id="<identifier>"`.
    pub fn element_by_id(&self, identifier: &str) -> Option<NodeId> {
        if identifier.is_empty() {
            return None;
        }
        iter::once(self.root())
            .chain(self.descendants(self.root()))
            .find(|id| self.get(*id).and_then(Element::id) == Some(identifier))
    }

    /// Pre-order walk over the strict descendants of `scope`, letting the
    /// visitor prune subtrees.
    pub fn walk(&self, scope: NodeId, mut visit: impl FnMut(NodeId, &Element) -> Walk) {
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.index()) else {
                continue;
            };
            if visit(id, &node.element) == Walk::Continue {
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    /// Concatenated text of `id` and all of its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for node in iter::once(id).chain(self.descendants(id)) {
            if let Some(el) = self.get(node) {
                if !el.text.is_empty() {
                    parts.push(&el.text);
                }
            }
        }
        parts.join(" ")
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id.index()).map(|n| n.rect)
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(DomError::UnknownNode(id))?;
        node.rect = rect;
        Ok(())
    }
}

/// Iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::default();
        let section = doc
            .append(doc.root(), Element::new("section").with_id("about"))
            .unwrap();
        let link = doc
            .append(section, Element::new("a").with_attr("href", "#contact"))
            .unwrap();
        let span = doc
            .append(link, Element::new("span").with_text("Contact"))
            .unwrap();
        (doc, section, link, span)
    }

    #[test]
    fn descendants_follow_document_order() {
        let (mut doc, section, link, span) = sample();
        let footer = doc.append(doc.root(), Element::new("footer")).unwrap();
        let order: Vec<_> = doc.descendants(doc.root()).collect();
        assert_eq!(order, vec![section, link, span, footer]);
    }

    #[test]
    fn closest_includes_self_and_stops_at_root() {
        let (doc, section, link, span) = sample();
        assert_eq!(doc.closest(span, |el| el.is("a")), Some(link));
        assert_eq!(doc.closest(link, |el| el.is("a")), Some(link));
        assert_eq!(doc.closest(span, |el| el.is("section")), Some(section));
        assert_eq!(doc.closest(span, |el| el.is("nav")), None);
    }

    #[test]
    fn element_by_id_finds_first_match() {
        let (doc, section, _, _) = sample();
        assert_eq!(doc.element_by_id("about"), Some(section));
        assert_eq!(doc.element_by_id("missing"), None);
        assert_eq!(doc.element_by_id(""), None);
    }

    #[test]
    fn walk_can_prune_subtrees() {
        let (doc, section, link, _) = sample();
        let mut seen = Vec::new();
        doc.walk(doc.root(), |id, el| {
            seen.push(id);
            if el.is("a") { Walk::SkipChildren } else { Walk::Continue }
        });
        assert_eq!(seen, vec![section, link]);
    }

    #[test]
    fn append_to_unknown_parent_fails() {
        let mut doc = Document::default();
        let err = doc.append(NodeId(42), Element::new("div")).unwrap_err();
        assert!(matches!(err, DomError::UnknownNode(_)));
    }

    #[test]
    fn text_content_collects_subtree() {
        let (doc, section, _, _) = sample();
        assert_eq!(doc.text_content(section), "Contact");
    }
}
