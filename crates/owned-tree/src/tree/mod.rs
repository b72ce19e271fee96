//! Owned tree nodes
//!
//! This module provides a generic tree node that owns its children, keeps a
//! weak link to its parent, and can be backed by any child container that
//! implements [`ChildContainer`].

mod container;
mod error;
mod identity;
mod list;
mod map;
mod node;
mod walk;

pub use container::ChildContainer;
pub use error::{Result, StructureViolation, TreeError};
pub use identity::NodeId;
pub use list::{ListTreeNode, NodeList};
pub use map::{MapTreeNode, NodeMap};
pub use node::TreeNode;
pub use walk::{TraversalOrder, TreeWalker, WalkOptions};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        ChildContainer, ListTreeNode, MapTreeNode, NodeId, NodeList, NodeMap, StructureViolation,
        TraversalOrder, TreeError, TreeNode, TreeWalker, WalkOptions,
    };
}
