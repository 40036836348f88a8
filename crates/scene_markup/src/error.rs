//! Markup errors

use thiserror::Error;

use crate::document::NodeId;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, MarkupError>;

/// Document errors
#[derive(Debug, Error)]
pub enum MarkupError {
    /// Handle does not belong to this document
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Operation needs an element, got text or a comment
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// The document already has a root element
    #[error("Document already has a root element")]
    RootExists,

    /// The document has no root element to write
    #[error("Document has no root element")]
    NoRoot,

    /// Serialization failed
    #[error("Failed to write markup: {0}")]
    Write(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
