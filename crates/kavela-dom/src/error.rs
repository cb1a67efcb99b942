//! Error types for document construction and layout.

use thiserror::Error;

use crate::document::NodeId;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors that can occur while building or laying out a document.
#[derive(Error, Debug)]
pub enum DomError {
    /// A node handle did not belong to this document.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// The HTML source had no element to use as the document root.
    #[error("document has no root element")]
    MissingRoot,

    /// The layout engine rejected the tree.
    #[error("layout failed: {0}")]
    Layout(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
