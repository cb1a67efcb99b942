//! Smooth in-page navigation for `href="#id"` links.
//!
//! A single click listener at the page level catches clicks anywhere inside
//! a fragment link, resolves the fragment against the document at click time
//! and replaces the instant jump with one smooth scroll request.

use kavela_dom::{Document, NodeId};
use tracing::{debug, trace};

use crate::context::ScrollBehavior;
use crate::events::{ClickEvent, ListenerHandle};
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavigatorOptions {
    /// Space left above the target, for fixed headers.
    pub scroll_offset: f32,
}

/// The nearest `<a href="#...">` at or above `origin`, with its fragment.
pub fn fragment_link(document: &Document, origin: NodeId) -> Option<(NodeId, &str)> {
    let link = document.closest(origin, |el| {
        el.is("a") && el.href().is_some_and(|href| href.starts_with('#'))
    })?;
    let fragment = document.get(link)?.href()?.strip_prefix('#')?;
    Some((link, fragment))
}

/// The element a click should scroll to, if any.
///
/// `None` when the click was not inside a fragment link, or when the
/// fragment names no element; the default navigation then applies.
pub fn resolve_target(document: &Document, event: &ClickEvent) -> Option<NodeId> {
    let (_, fragment) = fragment_link(document, event.target())?;
    document.element_by_id(fragment)
}

#[derive(Debug)]
pub struct AnchorNavigator {
    listener: ListenerHandle,
    options: NavigatorOptions,
}

impl AnchorNavigator {
    pub fn mount(page: &Page, options: NavigatorOptions) -> Self {
        let offset = options.scroll_offset;
        let listener = page.on_click(move |event, ctx| {
            let Some(target) = resolve_target(ctx.document(), event) else {
                trace!(node = ?event.target(), "click ignored by navigator");
                return;
            };
            event.prevent_default();
            debug!(node = ?target, offset, "smooth scroll to fragment");
            ctx.request_scroll(target, offset, ScrollBehavior::Smooth);
        });
        debug!(scroll_offset = offset, "anchor navigator mounted");
        Self { listener, options }
    }

    pub fn options(&self) -> NavigatorOptions {
        self.options
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_attached()
    }

    /// Remove the click listener. Dropping the navigator does the same.
    pub fn unmount(mut self) {
        self.listener.remove();
        debug!("anchor navigator unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kavela_dom::Element;

    fn nav_document() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::default();
        let body = doc.root();
        let link = doc.append(body, Element::new("a").with_attr("href", "#services")).unwrap();
        let label = doc.append(link, Element::new("span").with_text("Services")).unwrap();
        let section = doc.append(body, Element::new("section").with_id("services")).unwrap();
        (doc, link, label, section)
    }

    #[test]
    fn resolves_through_ancestors() {
        let (doc, link, label, section) = nav_document();
        assert_eq!(fragment_link(&doc, label), Some((link, "services")));
        assert_eq!(resolve_target(&doc, &ClickEvent::new(label)), Some(section));
        assert_eq!(resolve_target(&doc, &ClickEvent::new(link)), Some(section));
    }

    #[test]
    fn ignores_clicks_outside_fragment_links() {
        let (mut doc, _, _, section) = nav_document();
        let external = doc
            .append(doc.root(), Element::new("a").with_attr("href", "/about#team"))
            .unwrap();
        assert_eq!(resolve_target(&doc, &ClickEvent::new(section)), None);
        assert_eq!(resolve_target(&doc, &ClickEvent::new(external)), None);
    }

    #[test]
    fn unknown_and_empty_fragments_do_not_resolve() {
        let mut doc = Document::default();
        let missing = doc
            .append(doc.root(), Element::new("a").with_attr("href", "#missing"))
            .unwrap();
        let bare = doc.append(doc.root(), Element::new("a").with_attr("href", "#")).unwrap();
        assert_eq!(fragment_link(&doc, bare), Some((bare, "")));
        assert_eq!(resolve_target(&doc, &ClickEvent::new(missing)), None);
        assert_eq!(resolve_target(&doc, &ClickEvent::new(bare)), None);
    }
}
