//! Map-backed nodes: children keyed by node identity

use std::collections::BTreeMap;
use std::fmt;

use crate::tree::{ChildContainer, NodeId, TreeNode};

/// A tree node whose children are keyed by identity
pub type MapTreeNode<V> = TreeNode<V, NodeMap<V>>;

/// Child container backed by a `BTreeMap<NodeId, _>`
///
/// Siblings are ordered by [`NodeId`], which follows creation order, not the
/// order passed to [`TreeNode::set_children`]. That order carries no meaning,
/// so structural equality matches map-backed children regardless of it.
/// Removal and lookup by id are logarithmic; positional access walks the map.
pub struct NodeMap<V>(BTreeMap<NodeId, MapTreeNode<V>>);

impl<V> NodeMap<V> {
    /// Look up a child by its identity
    pub fn get_by_id(&self, id: NodeId) -> Option<&MapTreeNode<V>> {
        self.0.get(&id)
    }

    /// Returns true if a child with this identity is present
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains_key(&id)
    }

    /// Identities of the children, in iteration order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.keys().copied()
    }
}

impl<V> Default for NodeMap<V> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<V: fmt::Debug> fmt::Debug for NodeMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<V> ChildContainer<V> for NodeMap<V> {
    const ORDERED: bool = false;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a MapTreeNode<V>> + 'a>
    where
        V: 'a,
    {
        Box::new(self.0.values())
    }

    fn replace_all(&mut self, children: Vec<MapTreeNode<V>>) -> Vec<MapTreeNode<V>> {
        let previous = std::mem::take(&mut self.0);
        self.0 = children.into_iter().map(|child| (child.id(), child)).collect();
        previous.into_values().collect()
    }

    fn remove(&mut self, child: &MapTreeNode<V>) -> Option<MapTreeNode<V>> {
        self.0.remove(&child.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TraversalOrder, TreeError};
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_children_ordered_by_identity() {
        let first = MapTreeNode::new("first");
        let second = MapTreeNode::new("second");
        let third = MapTreeNode::new("third");
        let root = MapTreeNode::new("root");

        root.set_children([third.clone(), first.clone(), second.clone()])
            .unwrap();

        let values: Vec<&str> = root.iter().map(|n| *n.value()).collect();
        assert_eq!(values, vec!["root", "first", "second", "third"]);
        assert!(root.child(2).unwrap().ptr_eq(&third));
        assert_eq!(
            root.child(3).unwrap_err(),
            TreeError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let child = MapTreeNode::new(1);
        let root = MapTreeNode::with_children(0, [child.clone()]).unwrap();

        let children = root.children();
        assert!(children.contains(child.id()));
        assert!(children.get_by_id(child.id()).unwrap().ptr_eq(&child));
        assert!(children.get_by_id(root.id()).is_none());
        assert_eq!(children.ids().collect::<Vec<_>>(), vec![child.id()]);
    }

    #[test]
    fn test_reparenting_between_map_nodes() {
        let a = MapTreeNode::new(0);
        let b = MapTreeNode::new(1);
        let x = MapTreeNode::new(2);
        a.set_children([x.clone()]).unwrap();
        b.set_children([x.clone()]).unwrap();

        assert!(a.is_leaf());
        assert!(x.parent().unwrap().ptr_eq(&b));
        assert!(x.root().ptr_eq(&b));
    }

    #[test]
    fn test_structural_equality_and_copy() {
        let build = || {
            let inner = MapTreeNode::with_children(2, [MapTreeNode::new(3)]).unwrap();
            MapTreeNode::with_children(1, [inner, MapTreeNode::new(4)]).unwrap()
        };
        let a = build();
        let b = build();
        assert!(a == b);

        let copy = a.deep_copy();
        assert!(copy == a);
        let walked: Vec<i32> = copy
            .walk(TraversalOrder::PreOrder)
            .map(|n| *n.value())
            .collect();
        assert_eq!(walked, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_equality_ignores_creation_order() {
        let x = MapTreeNode::new(2);
        let y = MapTreeNode::new(3);
        let a = MapTreeNode::with_children(1, [x, y]).unwrap();

        // Same values, but the siblings are created the other way round.
        let y2 = MapTreeNode::new(3);
        let x2 = MapTreeNode::new(2);
        let b = MapTreeNode::with_children(1, [x2, y2]).unwrap();

        let walked: Vec<i32> = b.iter().map(|n| *n.value()).collect();
        assert_eq!(walked, vec![1, 3, 2]);
        assert!(a == b);
        assert!(b == a);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_matches_whole_subtrees() {
        // 1[2[3], 4] against 1[4, 2[3]] built in a different creation order.
        let a = MapTreeNode::with_children(
            1,
            [
                MapTreeNode::with_children(2, [MapTreeNode::new(3)]).unwrap(),
                MapTreeNode::new(4),
            ],
        )
        .unwrap();
        let four = MapTreeNode::new(4);
        let two = MapTreeNode::with_children(2, [MapTreeNode::new(3)]).unwrap();
        let b = MapTreeNode::with_children(1, [two, four]).unwrap();
        assert!(a == b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // Same values everywhere, but the 3 hangs under a different parent.
        let c = MapTreeNode::with_children(
            1,
            [
                MapTreeNode::new(2),
                MapTreeNode::with_children(4, [MapTreeNode::new(3)]).unwrap(),
            ],
        )
        .unwrap();
        assert!(a != c);
        assert!(c != a);
    }

    #[test]
    fn test_repeated_values_compare_as_multiset() {
        let pair = |first: i32, second: i32| {
            MapTreeNode::with_children(0, [MapTreeNode::new(first), MapTreeNode::new(second)])
                .unwrap()
        };
        let a = pair(7, 7);
        let b = pair(7, 8);
        let c = pair(8, 7);
        assert!(a != b);
        assert!(b == c);
        assert_eq!(hash_of(&b), hash_of(&c));
        assert!(a != MapTreeNode::with_children(0, [MapTreeNode::new(7)]).unwrap());
    }

    #[test]
    fn test_equality_ignores_parent_and_descendants_differ() {
        let a = MapTreeNode::with_children(0, [MapTreeNode::new(1)]).unwrap();
        let b = a.deep_copy();
        let holder = MapTreeNode::new(9);
        holder.set_children([b.clone()]).unwrap();
        assert!(a == b);
        assert!(a != a.child(0).unwrap());
    }
}
