//! Error types for the source scene contract

use std::path::PathBuf;
use thiserror::Error;

use crate::id::ObjectId;

/// Result type for adapter calls
pub type Result<T> = std::result::Result<T, GraphError>;

/// Structural failures of the source scene.
///
/// Raised when a node or component itself cannot be read. A dump that hits
/// one of these fails as a whole.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The host refused to enumerate part of an object
    #[error("Failed to read {what} of {object}: {reason}")]
    Unavailable {
        object: ObjectId,
        what: &'static str,
        reason: String,
    },

    /// The scene has no roots to enumerate
    #[error("Scene roots unavailable: {0}")]
    RootsUnavailable(String),

    /// Scene description could not be parsed
    #[error("Failed to parse scene description: {0}")]
    Parse(String),

    /// Scene description file has an extension we do not read
    #[error("Unsupported scene description format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Create an unavailable error
    pub fn unavailable(object: ObjectId, what: &'static str, reason: impl Into<String>) -> Self {
        GraphError::Unavailable {
            object,
            what,
            reason: reason.into(),
        }
    }
}

/// A single property that could not be read.
///
/// Local to one property; the dump skips it and continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Property '{property}' could not be read: {reason}")]
pub struct PropertyFault {
    pub property: String,
    pub reason: String,
}

impl PropertyFault {
    pub fn new(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            reason: reason.into(),
        }
    }
}
