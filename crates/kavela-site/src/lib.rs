//! The Kavela Consulting page.
//!
//! [`content`] holds the copy as immutable records, [`render`] turns it into
//! a `kavela_dom::Document` carrying reveal and anchor markup, and [`theme`]
//! keeps the brand colors and exported stylesheet.

pub mod content;
pub mod render;
pub mod theme;

pub use content::{KAVELA, SiteContent};
pub use render::{build_document, render_page, render_section};
pub use theme::stylesheet;
