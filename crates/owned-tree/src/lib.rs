//! Owned Tree Library
//!
//! A generic tree node for scene graphs and other hierarchies where each node
//! owns its children and knows its parent.
//!
//! # Core Concepts
//!
//! - **TreeNode**: a cheap handle to a node; children are owned, the parent
//!   link is weak, so dropping a subtree's last owner frees all of it
//! - **ChildContainer**: the capability a child collection must provide
//!   (`NodeList` keeps input order, `NodeMap` keys children by identity)
//! - **TreeWalker**: stack-bounded pre-order, post-order, and breadth-first
//!   iteration that can be restarted at will
//!
//! Structural equality (`==`) compares values and children and ignores the
//! parent link; [`tree::TreeNode::ptr_eq`] compares identity.
//!
//! # Example
//!
//! ```
//! use owned_tree::prelude::*;
//!
//! let mut counter = 0;
//! let mut next = || {
//!     counter += 1;
//!     counter - 1
//! };
//!
//! let root = ListTreeNode::new(next());
//! let mut children = Vec::new();
//! for _ in 0..3 {
//!     let child = ListTreeNode::new(next());
//!     child.set_children([ListTreeNode::new(next())])?;
//!     children.push(child);
//! }
//! root.set_children(children)?;
//!
//! let order: Vec<i32> = root.iter().map(|node| *node.value()).collect();
//! assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6]);
//! # Ok::<(), owned_tree::tree::TreeError>(())
//! ```

pub mod tree;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::tree::prelude::*;
}
