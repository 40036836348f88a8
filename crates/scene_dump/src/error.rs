//! Dump errors

use thiserror::Error;

use scene_graph::{GraphError, ObjectId};
use scene_markup::MarkupError;

/// Result type for dump operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Failures that abort a dump.
///
/// Per-property faults never show up here; they are recovered and recorded as
/// diagnostics.
#[derive(Debug, Error)]
pub enum DumpError {
    /// A node or component itself could not be read
    #[error("Structural failure: {source}")]
    Structural {
        /// Object whose read failed, when the adapter named one
        object: Option<ObjectId>,
        source: GraphError,
    },

    /// Output document error
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    /// Invalid options
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GraphError> for DumpError {
    fn from(source: GraphError) -> Self {
        let object = match &source {
            GraphError::Unavailable { object, .. } => Some(*object),
            _ => None,
        };
        DumpError::Structural { object, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_carries_object() {
        let err: DumpError = GraphError::unavailable(ObjectId::new(0x2A), "children", "gone").into();
        match &err {
            DumpError::Structural { object, .. } => assert_eq!(*object, Some(ObjectId::new(0x2A))),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Structural failure: Failed to read children of 0x0000002A: gone"
        );

        let err: DumpError = GraphError::RootsUnavailable("no scene".into()).into();
        assert!(matches!(err, DumpError::Structural { object: None, .. }));
    }
}
