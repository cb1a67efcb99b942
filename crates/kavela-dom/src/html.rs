//! HTML bridge: import through `scraper`, export as a serialized string.

use std::fmt::Write as _;
use std::path::Path;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

use crate::document::{Document, NodeId};
use crate::element::Element;
use crate::error::{DomError, Result};

const SKIPPED_TAGS: &[&str] = &["script", "style", "meta", "link", "head", "template"];
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Parse an HTML page into a [`Document`] rooted at its `<body>`.
///
/// Falls back to the first top-level element when no body is present.
pub fn document_from_html(html: &str) -> Result<Document> {
    let parsed = Html::parse_document(html);
    let root = find_body(&parsed)
        .or_else(|| {
            parsed
                .tree
                .root()
                .children()
                .find(|child| matches!(child.value(), Node::Element(_)))
        })
        .ok_or(DomError::MissingRoot)?;
    let root_ref = ElementRef::wrap(root).ok_or(DomError::MissingRoot)?;

    let mut doc = Document::new(convert_element(&root_ref));
    let parent = doc.root();
    convert_children(&mut doc, parent, root)?;
    debug!(nodes = doc.len(), "imported HTML document");
    Ok(doc)
}

pub fn document_from_file(path: &Path) -> Result<Document> {
    let html = std::fs::read_to_string(path)?;
    document_from_html(&html)
}

fn find_body(document: &Html) -> Option<NodeRef<'_, Node>> {
    let selector = Selector::parse("body").ok()?;
    document
        .select(&selector)
        .next()
        .map(|body| *body)
}

fn convert_element(element: &ElementRef<'_>) -> Element {
    let value = element.value();
    let mut converted = Element::new(value.name());
    for (name, attr) in value.attrs() {
        converted.set_attr(name, attr);
    }
    converted.text = normalize_whitespace(&direct_text(element));
    converted
}

fn convert_children(doc: &mut Document, parent: NodeId, node: NodeRef<'_, Node>) -> Result<()> {
    for child in node.children() {
        let Some(element_ref) = ElementRef::wrap(child) else {
            continue;
        };
        let tag = element_ref.value().name().to_ascii_lowercase();
        if SKIPPED_TAGS.contains(&tag.as_str()) {
            continue;
        }
        let id = doc.append(parent, convert_element(&element_ref))?;
        convert_children(doc, id, child)?;
    }
    Ok(())
}

fn direct_text(element: &ElementRef<'_>) -> String {
    let mut content = String::new();
    for child in element.children() {
        if let Node::Text(text) = child.value() {
            content.push_str(text);
            content.push(' ');
        }
    }
    content
}

fn normalize_whitespace(input: &str) -> String {
    let mut result = String::new();
    let mut prev_was_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !prev_was_space && !result.is_empty() {
                result.push(' ');
            }
            prev_was_space = true;
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result.trim_end().to_string()
}

/// Serialize `doc` as a standalone HTML page.
pub fn render_html(doc: &Document, title: &str) -> String {
    render_html_with_style(doc, title, "")
}

/// Like [`render_html`], with `stylesheet` inlined in the head when non-empty.
pub fn render_html_with_style(doc: &Document, title: &str, stylesheet: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_text(title));
    if !stylesheet.is_empty() {
        let _ = writeln!(out, "<style>\n{}\n</style>", stylesheet.trim());
    }
    out.push_str("</head>\n");
    write_node(doc, doc.root(), 0, &mut out);
    out.push_str("</html>\n");
    out
}

/// Serialize the subtree rooted at `id` without a page wrapper.
pub fn render_fragment(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, 0, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let Some(el) = doc.get(id) else {
        warn!(?id, "skipping unknown node during serialization");
        return;
    };
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}<{}", el.tag);
    if !el.classes().is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes().join(" ")));
    }
    for (name, value) in el.attrs() {
        if value.is_empty() {
            let _ = write!(out, " {name}");
        } else {
            let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
        }
    }
    out.push('>');
    if VOID_TAGS.contains(&el.tag.as_str()) {
        out.push('\n');
        return;
    }
    let children = doc.children(id);
    if children.is_empty() {
        let _ = writeln!(out, "{}</{}>", escape_text(&el.text), el.tag);
        return;
    }
    out.push('\n');
    if !el.text.is_empty() {
        let _ = writeln!(out, "{indent}  {}", escape_text(&el.text));
    }
    for child in children {
        write_node(doc, *child, depth + 1, out);
    }
    let _ = writeln!(out, "{indent}</{}>", el.tag);
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    escape_text(input).replace('"', "&quot;")
}
