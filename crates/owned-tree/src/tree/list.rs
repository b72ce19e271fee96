//! List-backed nodes: children kept in the order they were given

use std::fmt;

use crate::tree::{ChildContainer, Result, TreeError, TreeNode};

/// A tree node whose children are an ordered list
pub type ListTreeNode<V> = TreeNode<V, NodeList<V>>;

/// Ordered child container backed by a `Vec`
///
/// Sibling order is exactly the order passed to
/// [`TreeNode::set_children`], and indexed access is constant time.
pub struct NodeList<V>(Vec<ListTreeNode<V>>);

impl<V> NodeList<V> {
    /// View the children as a slice
    pub fn as_slice(&self) -> &[ListTreeNode<V>] {
        &self.0
    }

    /// Position of a child by identity
    pub fn position(&self, child: &ListTreeNode<V>) -> Option<usize> {
        self.0.iter().position(|node| node.ptr_eq(child))
    }
}

impl<V> Default for NodeList<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V: fmt::Debug> fmt::Debug for NodeList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<V> ChildContainer<V> for NodeList<V> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a ListTreeNode<V>> + 'a>
    where
        V: 'a,
    {
        Box::new(self.0.iter())
    }

    fn get<'a>(&'a self, index: usize) -> Result<&'a ListTreeNode<V>>
    where
        V: 'a,
    {
        self.0.get(index).ok_or(TreeError::IndexOutOfRange {
            index,
            len: self.0.len(),
        })
    }

    fn replace_all(&mut self, children: Vec<ListTreeNode<V>>) -> Vec<ListTreeNode<V>> {
        std::mem::replace(&mut self.0, children)
    }

    fn remove(&mut self, child: &ListTreeNode<V>) -> Option<ListTreeNode<V>> {
        let index = self.position(child)?;
        Some(self.0.remove(index))
    }
}
