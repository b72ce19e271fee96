//! The tree node core
//!
//! [`TreeNode`] is a handle to a node that owns its children through a
//! [`ChildContainer`] and points at its parent with a weak link. Cloning the
//! handle is cheap and never copies the tree; use [`TreeNode::deep_copy`] for
//! a structural copy.

use log::{debug, trace, warn};
use smallvec::SmallVec;
use std::cell::Ref;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use crate::tree::identity::NodeCell;
use crate::tree::{
    ChildContainer, NodeId, Result, StructureViolation, TraversalOrder, TreeError, TreeWalker,
    WalkOptions,
};

/// A node in an owned tree
///
/// Generic over the value type `V` and the child container `C`. The concrete
/// variants [`crate::tree::ListTreeNode`] and [`crate::tree::MapTreeNode`]
/// fix `C` to an ordered list and an identity-keyed map respectively.
///
/// Two kinds of comparison are available:
/// - `==` is structural: values and children, recursively, in container
///   order when the container is ordered and as a multiset otherwise. The
///   parent link is never compared.
/// - [`TreeNode::ptr_eq`] (or comparing [`TreeNode::id`]) tests whether two
///   handles refer to the same instance.
///
/// Nodes are single-threaded; a tree can only be shared across threads
/// behind external synchronization of a type that is itself `Send`.
///
/// # Example
///
/// ```
/// use owned_tree::prelude::*;
///
/// let root = ListTreeNode::new(0);
/// let child = ListTreeNode::new(1);
/// root.set_children([child.clone()]).unwrap();
///
/// assert!(root.is_root());
/// assert!(child.parent().unwrap().ptr_eq(&root));
/// assert!(child.root().ptr_eq(&root));
/// assert!(child.is_leaf());
/// ```
pub struct TreeNode<V, C: ChildContainer<V>> {
    pub(crate) cell: Rc<NodeCell<V, C>>,
}

impl<V, C: ChildContainer<V>> Clone for TreeNode<V, C> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<V, C: ChildContainer<V>> TreeNode<V, C> {
    /// Create a childless root node
    pub fn new(value: V) -> Self {
        Self {
            cell: NodeCell::new(value),
        }
    }

    /// Create a root node and adopt `children` as with [`TreeNode::set_children`]
    pub fn with_children<I>(value: V, children: I) -> Result<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let node = Self::new(value);
        node.set_children(children)?;
        Ok(node)
    }

    /// The identity of this node instance
    pub fn id(&self) -> NodeId {
        self.cell.id
    }

    /// Returns true if both handles refer to the same node instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Borrow the node's value
    pub fn value(&self) -> Ref<'_, V> {
        self.cell.value.borrow()
    }

    /// Replace the node's value, returning the old one
    pub fn replace_value(&self, value: V) -> V {
        self.cell.value.replace(value)
    }

    /// Get the parent of this node
    ///
    /// Returns `None` for a root. A node whose parent has been dropped is
    /// also a root.
    pub fn parent(&self) -> Option<Self> {
        self.cell
            .parent
            .borrow()
            .upgrade()
            .map(|cell| Self { cell })
    }

    /// Returns true if this node has no (live) parent
    pub fn is_root(&self) -> bool {
        self.cell.parent.borrow().strong_count() == 0
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.cell.children.borrow().is_empty()
    }

    /// Get the root of the tree containing this node
    ///
    /// Returns a handle to `self` if this node is a root.
    pub fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Get the depth of this node (root = 0)
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent();
        }
        depth
    }

    /// Get all ancestors of this node, from parent to root
    pub fn ancestors(&self) -> Vec<Self> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(parent) = current {
            current = parent.parent();
            ancestors.push(parent);
        }
        ancestors
    }

    /// Check if this node is a proper ancestor of `other`
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        let mut current = other.parent();
        while let Some(parent) = current {
            if parent.ptr_eq(self) {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    /// Get the nodes from the root down to this node (inclusive)
    pub fn path_from_root(&self) -> Vec<Self> {
        let mut path = self.ancestors();
        path.reverse();
        path.push(self.clone());
        path
    }

    /// Borrow the child container
    ///
    /// The borrow must be released before this node's children are replaced
    /// or one of them is adopted elsewhere.
    pub fn children(&self) -> Ref<'_, C> {
        self.cell.children.borrow()
    }

    /// Get the child at `index` in container order
    pub fn child(&self, index: usize) -> Result<Self> {
        self.cell.children.borrow().get(index).cloned()
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.cell.children.borrow().len()
    }

    /// Replace all children of this node
    ///
    /// Each incoming node is detached from its previous parent (if that is a
    /// different node) and its parent link is pointed at `self`. Previous
    /// children that are not part of `children` are released and have their
    /// parent link cleared, so they become roots if anything else still holds
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidStructure`] if an incoming node is `self`
    /// or one of its ancestors, or if a node is listed twice. Nothing is
    /// modified in that case.
    pub fn set_children<I>(&self, children: I) -> Result<()>
    where
        I: IntoIterator<Item = Self>,
    {
        let incoming: Vec<Self> = children.into_iter().collect();
        let adopted = self.check_adoption(&incoming)?;

        let mut moved = 0;
        for child in &incoming {
            if let Some(previous) = child.parent() {
                if !previous.ptr_eq(self) {
                    trace!("Detaching {} from {}", child.id(), previous.id());
                    let removed = previous.cell.children.borrow_mut().remove(child);
                    if removed.is_none() {
                        warn!(
                            "{} links to parent {} but is not among its children",
                            child.id(),
                            previous.id()
                        );
                    }
                    moved += 1;
                }
            }
            *child.cell.parent.borrow_mut() = Rc::downgrade(&self.cell);
        }

        let released = self.cell.children.borrow_mut().replace_all(incoming);
        let mut cleared = 0;
        for old in &released {
            if !adopted.contains(&old.id()) {
                *old.cell.parent.borrow_mut() = Weak::new();
                cleared += 1;
            }
        }

        debug!(
            "{} adopted {} children ({} moved from another parent), released {}",
            self.id(),
            adopted.len(),
            moved,
            cleared
        );
        Ok(())
    }

    /// Validate incoming children before any link is touched.
    fn check_adoption(&self, incoming: &[Self]) -> Result<HashSet<NodeId>> {
        let mut ids = HashSet::with_capacity(incoming.len());
        for child in incoming {
            if !ids.insert(child.id()) {
                return Err(self.reject(child.id(), StructureViolation::Duplicate));
            }
        }

        let mut current = Some(self.clone());
        while let Some(node) = current {
            if ids.contains(&node.id()) {
                return Err(self.reject(node.id(), StructureViolation::Cycle));
            }
            current = node.parent();
        }

        Ok(ids)
    }

    fn reject(&self, node: NodeId, violation: StructureViolation) -> TreeError {
        debug!("{} rejected child {}: {}", self.id(), node, violation);
        TreeError::InvalidStructure { node, violation }
    }

    /// Install freshly created children that cannot form a cycle.
    fn adopt_fresh(&self, children: Vec<Self>) {
        for child in &children {
            *child.cell.parent.borrow_mut() = Rc::downgrade(&self.cell);
        }
        self.cell.children.borrow_mut().replace_all(children);
    }

    /// Make a structural copy of this node and its subtree
    ///
    /// Every copied node gets a new identity; values are cloned and parent
    /// links point at the copies. The returned node is a root, even if `self`
    /// is not.
    pub fn deep_copy(&self) -> Self
    where
        V: Clone,
    {
        let copy = Self::new(self.value().clone());
        let mut pending = vec![(self.clone(), copy.clone())];

        while let Some((source, target)) = pending.pop() {
            let copies: Vec<Self> = source
                .children()
                .iter()
                .map(|child| {
                    let duplicate = Self::new(child.value().clone());
                    pending.push((child.clone(), duplicate.clone()));
                    duplicate
                })
                .collect();
            target.adopt_fresh(copies);
        }

        copy
    }

    /// Walk this node and its descendants in the given order
    pub fn walk(&self, order: TraversalOrder) -> TreeWalker<V, C> {
        self.walk_with(WalkOptions::new().with_order(order))
    }

    /// Walk this node and its descendants with explicit options
    pub fn walk_with(&self, options: WalkOptions) -> TreeWalker<V, C> {
        TreeWalker::new(self, options)
    }

    /// Walk this node and its descendants in pre-order
    pub fn iter(&self) -> TreeWalker<V, C> {
        self.walk(TraversalOrder::PreOrder)
    }

    /// Count this node and all of its descendants
    pub fn subtree_size(&self) -> usize {
        self.iter().count()
    }

    /// Get all leaf nodes of this subtree in pre-order
    pub fn leaves(&self) -> Vec<Self> {
        self.iter().filter(|node| node.is_leaf()).collect()
    }

    /// Find the first node (in pre-order) whose value matches a predicate
    pub fn find<F>(&self, predicate: F) -> Option<Self>
    where
        F: Fn(&V) -> bool,
    {
        self.iter().find(|node| predicate(&*node.value()))
    }

    /// Find all nodes (in pre-order) whose value matches a predicate
    pub fn find_all<F>(&self, predicate: F) -> Vec<Self>
    where
        F: Fn(&V) -> bool,
    {
        self.iter().filter(|node| predicate(&*node.value())).collect()
    }
}

impl<V: Default, C: ChildContainer<V>> Default for TreeNode<V, C> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: PartialEq, C: ChildContainer<V>> PartialEq for TreeNode<V, C> {
    fn eq(&self, other: &Self) -> bool {
        if !C::ORDERED {
            return self.eq_unordered(other);
        }

        let mut pending: SmallVec<[(Self, Self); 8]> = SmallVec::new();
        pending.push((self.clone(), other.clone()));

        while let Some((left, right)) = pending.pop() {
            if left.ptr_eq(&right) {
                continue;
            }
            if *left.value() != *right.value() {
                return false;
            }
            let left_children = left.children();
            let right_children = right.children();
            if left_children.len() != right_children.len() {
                return false;
            }
            pending.extend(
                left_children
                    .iter()
                    .cloned()
                    .zip(right_children.iter().cloned()),
            );
        }

        true
    }
}

impl<V: PartialEq, C: ChildContainer<V>> TreeNode<V, C> {
    /// Structural equality with children compared as multisets.
    ///
    /// Both subtrees are visited in post-order and every node is assigned a
    /// shape class: two nodes share a class exactly when their values are
    /// equal and their children's classes form the same multiset. The trees
    /// are equal when their top nodes end up in the same class.
    fn eq_unordered(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.subtree_size() != other.subtree_size() {
            return false;
        }

        let mut classes: HashMap<NodeId, usize> = HashMap::new();
        let mut buckets: HashMap<Vec<usize>, SmallVec<[(usize, Self); 1]>> = HashMap::new();
        let mut next_class = 0;

        for top in [self, other] {
            for node in top.walk(TraversalOrder::PostOrder) {
                if classes.contains_key(&node.id()) {
                    continue;
                }
                let mut key: Vec<usize> = node
                    .children()
                    .iter()
                    .filter_map(|child| classes.get(&child.id()).copied())
                    .collect();
                key.sort_unstable();

                let bucket = buckets.entry(key).or_default();
                let found = bucket
                    .iter()
                    .find(|(_, sample)| *sample.value() == *node.value())
                    .map(|(class, _)| *class);
                let class = match found {
                    Some(class) => class,
                    None => {
                        let class = next_class;
                        next_class += 1;
                        bucket.push((class, node.clone()));
                        class
                    }
                };
                classes.insert(node.id(), class);
            }
        }

        trace!(
            "Compared {} and {} using {} shape classes",
            self.id(),
            other.id(),
            next_class
        );
        classes.get(&self.id()) == classes.get(&other.id())
    }
}

impl<V: Eq, C: ChildContainer<V>> Eq for TreeNode<V, C> {}

impl<V: Hash, C: ChildContainer<V>> Hash for TreeNode<V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if !C::ORDERED {
            self.unordered_fingerprint().hash(state);
            return;
        }
        // The pre-order sequence of (value, child count) pins down the shape.
        for node in self.iter() {
            (*node.value()).hash(state);
            node.child_count().hash(state);
        }
    }
}

impl<V: Hash, C: ChildContainer<V>> TreeNode<V, C> {
    /// Order-insensitive digest of the subtree.
    ///
    /// Each node hashes its value together with its children's digests in
    /// sorted order, so sibling order never affects the result.
    fn unordered_fingerprint(&self) -> u64 {
        let mut digests: HashMap<NodeId, u64> = HashMap::new();
        for node in self.walk(TraversalOrder::PostOrder) {
            let mut children: SmallVec<[u64; 8]> = node
                .children()
                .iter()
                .filter_map(|child| digests.remove(&child.id()))
                .collect();
            children.sort_unstable();

            let mut hasher = DefaultHasher::new();
            (*node.value()).hash(&mut hasher);
            children.as_slice().hash(&mut hasher);
            digests.insert(node.id(), hasher.finish());
        }
        digests.remove(&self.id()).unwrap_or_default()
    }
}

impl<V: fmt::Debug, C: ChildContainer<V>> fmt::Debug for TreeNode<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("id", &self.id())
            .field("value", &*self.value())
            .field("descendants", &Descendants(self))
            .finish_non_exhaustive()
    }
}

/// Everything below a node as `(depth, id, value)` entries in pre-order.
struct Descendants<'a, V, C: ChildContainer<V>>(&'a TreeNode<V, C>);

impl<V: fmt::Debug, C: ChildContainer<V>> fmt::Debug for Descendants<'_, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut walker = self.0.iter();
        while let Some((node, depth)) = walker.next_with_depth() {
            if depth > 0 {
                list.entry(&(depth, node.id(), &*node.value()));
            }
        }
        list.finish()
    }
}

/// Renders the subtree as an outline, one node per line, indented by two
/// spaces per level.
impl<V: fmt::Display, C: ChildContainer<V>> fmt::Display for TreeNode<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut walker = self.iter();
        let mut first = true;
        while let Some((node, depth)) = walker.next_with_depth() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{:indent$}{}", "", node.value(), indent = depth * 2)?;
        }
        Ok(())
    }
}

impl<'a, V, C: ChildContainer<V>> IntoIterator for &'a TreeNode<V, C> {
    type Item = TreeNode<V, C>;
    type IntoIter = TreeWalker<V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
