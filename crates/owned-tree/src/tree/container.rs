//! The child container capability
//!
//! A node keeps its children in any type implementing [`ChildContainer`].
//! The node core and the traversal engine only talk to children through this
//! trait, so a list, a map, or anything else that can enumerate and replace
//! node handles plugs in without changes to tree logic.

use crate::tree::{Result, TreeError, TreeNode};

/// A collection of child nodes owned by a single parent
///
/// The type parameter `V` is the value type of the nodes; the node handle
/// type is always `TreeNode<V, Self>`.
///
/// Implementations only store handles. Keeping parent links consistent is
/// the job of [`TreeNode::set_children`], which is the only caller that
/// mutates a container attached to a live node.
pub trait ChildContainer<V>: Default + Sized {
    /// Whether sibling order is part of a node's structure
    ///
    /// When false, structural equality and hashing treat each node's children
    /// as a multiset, so two trees built from the same values compare equal
    /// whatever order the container happens to iterate in.
    const ORDERED: bool = true;

    /// Number of children
    fn len(&self) -> usize;

    /// Returns true if there are no children
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the children
    ///
    /// The order of this iterator is the sibling order used by every
    /// traversal. Calling it again yields the same order as long as the
    /// container has not been mutated.
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a TreeNode<V, Self>> + 'a>
    where
        V: 'a;

    /// Get the child at `index` in iteration order
    ///
    /// The default walks the iterator; ordered containers should override it.
    fn get<'a>(&'a self, index: usize) -> Result<&'a TreeNode<V, Self>>
    where
        V: 'a,
    {
        let len = self.len();
        self.iter()
            .nth(index)
            .ok_or(TreeError::IndexOutOfRange { index, len })
    }

    /// Replace every child, returning the previous ones
    fn replace_all(&mut self, children: Vec<TreeNode<V, Self>>) -> Vec<TreeNode<V, Self>>;

    /// Remove a single child by identity
    ///
    /// Returns `None` if `child` is not held by this container.
    fn remove(&mut self, child: &TreeNode<V, Self>) -> Option<TreeNode<V, Self>>;
}
