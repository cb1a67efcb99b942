//! Document model for the Kavela site runtime.
//!
//! A small arena-backed element tree with just enough of the DOM surface for
//! the presentation engine: attribute and class access, ancestor walks,
//! identifier lookup, document-order traversal, per-element bounding
//! rectangles and an HTML bridge in both directions.

pub mod document;
pub mod element;
pub mod error;
pub mod geometry;
pub mod html;
pub mod layout;
pub mod style;

pub use document::{Descendants, Document, NodeId, Walk};
pub use element::Element;
pub use error::{DomError, Result};
pub use geometry::{Insets, Rect};
pub use html::{document_from_html, document_from_file};
pub use layout::{LayoutOptions, layout_document};

/// Structural markers shared by content producers and the presentation engine.
pub mod markers {
    /// Marks a container as a reveal group.
    pub const REVEAL_GROUP: &str = "data-reveal-group";
    /// Marks an animatable child of a reveal group.
    pub const REVEAL_ITEM: &str = "data-reveal";
    /// Class carried by a reveal item before its group triggers.
    pub const HIDDEN_CLASS: &str = "reveal-hidden";
    /// Class carried by a reveal item once revealed.
    pub const VISIBLE_CLASS: &str = "reveal-visible";
}
