//! Node identity and the shared cell that holds a node's value and links

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::tree::{ChildContainer, TreeNode};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a node instance
///
/// Allocated from a process-wide counter when a node is constructed and never
/// reused. Identity is independent of where the node sits in a tree, and of
/// the node's value: two structurally equal nodes always have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a NodeId from a raw value
    ///
    /// Useful for lookups such as [`crate::tree::NodeMap::get_by_id`]; nodes
    /// obtain their own ids from [`NodeId::next`].
    pub const fn new(id: u64) -> Self {
        NodeId(id)
    }

    /// Get the inner value
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next() -> Self {
        NodeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Storage behind a [`TreeNode`] handle
///
/// The parent link is weak: a child never keeps its parent alive. Children
/// are owned through the container.
pub(crate) struct NodeCell<V, C: ChildContainer<V>> {
    pub(crate) id: NodeId,
    pub(crate) value: RefCell<V>,
    pub(crate) parent: RefCell<Weak<NodeCell<V, C>>>,
    pub(crate) children: RefCell<C>,
}

impl<V, C: ChildContainer<V>> NodeCell<V, C> {
    pub(crate) fn new(value: V) -> Rc<Self> {
        Rc::new(Self {
            id: NodeId::next(),
            value: RefCell::new(value),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(C::default()),
        })
    }
}

impl<V, C: ChildContainer<V>> Drop for NodeCell<V, C> {
    fn drop(&mut self) {
        // Release the subtree with a heap stack. Any child we hold the last
        // strong reference to is emptied before it drops, so the nested drop
        // never recurses more than one level.
        let mut pending: Vec<TreeNode<V, C>> = self.children.get_mut().replace_all(Vec::new());
        while let Some(node) = pending.pop() {
            if Rc::strong_count(&node.cell) == 1 {
                pending.extend(node.cell.children.borrow_mut().replace_all(Vec::new()));
            }
        }
    }
}
