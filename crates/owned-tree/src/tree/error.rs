//! Errors raised by structural mutation and indexed child access

use derive_more::Display;

use crate::tree::NodeId;

/// The way a rejected `set_children` call would have broken the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StructureViolation {
    /// The incoming node is the adopting node itself or one of its ancestors
    #[display(fmt = "would become its own descendant")]
    Cycle,

    /// The incoming node was listed more than once
    #[display(fmt = "appears more than once")]
    Duplicate,
}

/// Errors returned by tree operations
///
/// Both variants describe programmer errors. A failed operation leaves the
/// tree exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TreeError {
    /// A mutation would have created a cycle or adopted a node twice
    #[display(fmt = "invalid structure: {} {}", node, violation)]
    InvalidStructure {
        /// The offending incoming node
        node: NodeId,
        /// What went wrong
        violation: StructureViolation,
    },

    /// An index past the end of an ordered child container
    #[display(fmt = "index {} out of range for {} children", index, len)]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The number of children at the time of the call
        len: usize,
    },
}

impl std::error::Error for TreeError {}

/// Result alias used throughout the tree module
pub type Result<T> = std::result::Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TreeError::InvalidStructure {
            node: NodeId::new(7),
            violation: StructureViolation::Cycle,
        };
        assert_eq!(
            err.to_string(),
            "invalid structure: NodeId(7) would become its own descendant"
        );

        let err = TreeError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(err.to_string(), "index 3 out of range for 2 children");
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(TreeError::IndexOutOfRange { index: 0, len: 0 });
        assert!(err.source().is_none());
    }
}
