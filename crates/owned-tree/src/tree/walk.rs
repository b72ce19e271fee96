//! Tree traversal
//!
//! [`TreeWalker`] is an external iterator over a node and its descendants.
//! It keeps its own work list of node handles, so traversal never recurses
//! and no cursor state is stored on the nodes themselves. Starting a new walk
//! from the same node yields the same sequence as long as the tree has not
//! been mutated in between.

use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use crate::tree::{ChildContainer, TreeNode};

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    #[default]
    PreOrder,
    /// Visit children before parent (bottom-up)
    PostOrder,
    /// Visit level by level (breadth-first)
    BreadthFirst,
}

/// Options controlling a walk.
///
/// # Example
///
/// ```
/// use owned_tree::prelude::*;
///
/// let root = ListTreeNode::with_children(0, [ListTreeNode::new(1)]).unwrap();
/// let options = WalkOptions::new().with_max_depth(0);
/// assert_eq!(root.walk_with(options).count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    /// The order nodes are yielded in.
    pub order: TraversalOrder,

    /// Deepest level to visit, relative to the starting node (depth 0).
    /// Nodes below this level are neither yielded nor expanded.
    pub max_depth: Option<usize>,
}

impl WalkOptions {
    /// Pre-order walk with no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the traversal order.
    pub fn with_order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }

    /// Limit the walk to `max_depth` levels below the starting node.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

struct Entry<V, C: ChildContainer<V>> {
    node: TreeNode<V, C>,
    depth: usize,
    expanded: bool,
}

impl<V, C: ChildContainer<V>> Entry<V, C> {
    fn new(node: TreeNode<V, C>, depth: usize) -> Self {
        Self {
            node,
            depth,
            expanded: false,
        }
    }
}

/// Iterator for traversing a subtree in different orders
///
/// Siblings are always visited in the order yielded by the child container.
/// For pre-order, a node with children `c1..ck` produces
/// `node, preorder(c1), ..., preorder(ck)`.
pub struct TreeWalker<V, C: ChildContainer<V>> {
    options: WalkOptions,
    pending: VecDeque<Entry<V, C>>,
}

impl<V, C: ChildContainer<V>> TreeWalker<V, C> {
    /// Create a new walker starting from the given node
    pub fn new(start: &TreeNode<V, C>, options: WalkOptions) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(Entry::new(start.clone(), 0));
        Self { options, pending }
    }

    /// The options this walker was created with
    pub fn options(&self) -> WalkOptions {
        self.options
    }

    /// Advance the walk, also returning the depth of the yielded node
    /// relative to the starting node.
    pub fn next_with_depth(&mut self) -> Option<(TreeNode<V, C>, usize)> {
        match self.options.order {
            TraversalOrder::PreOrder => self.next_preorder(),
            TraversalOrder::PostOrder => self.next_postorder(),
            TraversalOrder::BreadthFirst => self.next_breadthfirst(),
        }
    }

    fn next_preorder(&mut self) -> Option<(TreeNode<V, C>, usize)> {
        let current = self.pending.pop_back()?;
        // Children go on in reverse so the first child is popped next.
        for child in self.expand(&current.node, current.depth).into_iter().rev() {
            self.pending.push_back(child);
        }
        Some((current.node, current.depth))
    }

    fn next_postorder(&mut self) -> Option<(TreeNode<V, C>, usize)> {
        loop {
            let current = self.pending.back_mut()?;
            if current.expanded {
                let done = self.pending.pop_back()?;
                return Some((done.node, done.depth));
            }

            current.expanded = true;
            let (node, depth) = (current.node.clone(), current.depth);
            for child in self.expand(&node, depth).into_iter().rev() {
                self.pending.push_back(child);
            }
        }
    }

    fn next_breadthfirst(&mut self) -> Option<(TreeNode<V, C>, usize)> {
        let current = self.pending.pop_front()?;
        let children = self.expand(&current.node, current.depth);
        self.pending.extend(children);
        Some((current.node, current.depth))
    }

    /// Snapshot the children of `node` as walk entries, honoring the depth limit.
    fn expand(&self, node: &TreeNode<V, C>, depth: usize) -> SmallVec<[Entry<V, C>; 8]> {
        if matches!(self.options.max_depth, Some(max) if depth >= max) {
            return SmallVec::new();
        }
        node.children()
            .iter()
            .map(|child| Entry::new(child.clone(), depth + 1))
            .collect()
    }
}

impl<V, C: ChildContainer<V>> Iterator for TreeWalker<V, C> {
    type Item = TreeNode<V, C>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_with_depth().map(|(node, _)| node)
    }
}

impl<V, C: ChildContainer<V>> FusedIterator for TreeWalker<V, C> {}

impl<V, C: ChildContainer<V>> fmt::Debug for TreeWalker<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeWalker")
            .field("options", &self.options)
            .field("pending", &self.pending.len())
            .finish()
    }
}
