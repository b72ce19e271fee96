//! Property tests over randomly shaped trees

use owned_tree::prelude::*;
use proptest::prelude::*;

/// Plain description of a tree, used to generate and rebuild trees.
#[derive(Debug, Clone)]
struct Shape {
    value: i64,
    children: Vec<Shape>,
}

impl Shape {
    fn build(&self) -> ListTreeNode<i64> {
        let node = ListTreeNode::new(self.value);
        let children: Vec<_> = self.children.iter().map(Shape::build).collect();
        node.set_children(children)
            .expect("fresh nodes always form a valid tree");
        node
    }

    /// Build a map-backed tree, creating siblings last-to-first when `reversed`.
    fn build_map(&self, reversed: bool) -> MapTreeNode<i64> {
        let node = MapTreeNode::new(self.value);
        let mut children: Vec<_> = if reversed {
            self.children.iter().rev().map(|c| c.build_map(reversed)).collect()
        } else {
            self.children.iter().map(|c| c.build_map(reversed)).collect()
        };
        if reversed {
            children.reverse();
        }
        node.set_children(children)
            .expect("fresh nodes always form a valid tree");
        node
    }

    fn preorder(&self, out: &mut Vec<i64>) {
        out.push(self.value);
        for child in &self.children {
            child.preorder(out);
        }
    }
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = any::<i64>().prop_map(|value| Shape {
        value,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 64, 6, |inner| {
        (any::<i64>(), prop::collection::vec(inner, 0..6))
            .prop_map(|(value, children)| Shape { value, children })
    })
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

proptest! {
    #[test]
    fn preorder_matches_shape(shape in shape()) {
        init_logging();
        let tree = shape.build();
        let mut expected = Vec::new();
        shape.preorder(&mut expected);

        let walked: Vec<i64> = tree.iter().map(|n| *n.value()).collect();
        prop_assert_eq!(&walked, &expected);

        // Restarting yields the same sequence.
        let again: Vec<i64> = tree.iter().map(|n| *n.value()).collect();
        prop_assert_eq!(walked, again);
        prop_assert_eq!(tree.subtree_size(), expected.len());
    }

    #[test]
    fn parent_links_are_consistent(shape in shape()) {
        init_logging();
        let tree = shape.build();
        prop_assert!(tree.is_root());
        for node in tree.iter() {
            for child in node.children().iter() {
                prop_assert!(child.parent().unwrap().ptr_eq(&node));
            }
            prop_assert_eq!(node.is_leaf(), node.child_count() == 0);
            prop_assert!(node.root().ptr_eq(&tree));
            prop_assert!(node.root().root().ptr_eq(&node.root()));
        }
    }

    #[test]
    fn independent_builds_are_equal(shape in shape()) {
        let a = shape.build();
        let b = shape.build();
        prop_assert!(!a.ptr_eq(&b));
        prop_assert!(a == b);

        let holder = ListTreeNode::new(0);
        holder.set_children([b.clone()]).unwrap();
        prop_assert!(a == b);
    }

    #[test]
    fn never_equal_to_a_descendant(shape in shape()) {
        let tree = shape.build();
        for node in tree.iter().skip(1) {
            prop_assert!(tree != node);
        }
    }

    #[test]
    fn deep_copy_is_equal_but_independent(shape in shape()) {
        let tree = shape.build();
        let copy = tree.deep_copy();
        prop_assert!(!copy.ptr_eq(&tree));
        prop_assert!(copy == tree);

        let grafted = ListTreeNode::new(0);
        copy.set_children([grafted]).unwrap();
        prop_assert!(tree == shape.build());
        prop_assert_eq!(copy.child_count(), 1);
    }

    #[test]
    fn cyclic_set_children_changes_nothing(shape in shape(), pick in any::<prop::sample::Index>()) {
        init_logging();
        let tree = shape.build();
        let nodes: Vec<_> = tree.iter().collect();
        let target = pick.get(&nodes).clone();
        let parent_before = target.parent();
        let children_before: Vec<NodeId> = target.children().iter().map(|c| c.id()).collect();

        let err = target.set_children([tree.clone()]).unwrap_err();
        prop_assert_eq!(
            err,
            TreeError::InvalidStructure {
                node: tree.id(),
                violation: StructureViolation::Cycle,
            }
        );

        prop_assert!(tree == shape.build());
        prop_assert!(tree.is_root());
        prop_assert_eq!(
            target.parent().map(|p| p.id()),
            parent_before.map(|p| p.id())
        );
        let children_after: Vec<NodeId> = target.children().iter().map(|c| c.id()).collect();
        prop_assert_eq!(children_after, children_before);
    }

    #[test]
    fn moving_a_subtree_keeps_both_trees_consistent(
        shape in shape(),
        pick in any::<prop::sample::Index>(),
    ) {
        let tree = shape.build();
        let nodes: Vec<_> = tree.iter().skip(1).collect();
        prop_assume!(!nodes.is_empty());
        let moved = pick.get(&nodes).clone();
        let old_parent = moved.parent().unwrap();
        let size = moved.subtree_size();
        let before = tree.subtree_size();

        let other = ListTreeNode::new(-1);
        other.set_children([moved.clone()]).unwrap();

        prop_assert!(moved.parent().unwrap().ptr_eq(&other));
        prop_assert!(old_parent.children().position(&moved).is_none());
        prop_assert_eq!(tree.subtree_size(), before - size);
        prop_assert_eq!(other.subtree_size(), size + 1);
    }

    #[test]
    fn map_equality_ignores_creation_order(shape in shape()) {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash_of = |node: &MapTreeNode<i64>| {
            let mut hasher = DefaultHasher::new();
            node.hash(&mut hasher);
            hasher.finish()
        };

        let forward = shape.build_map(false);
        let backward = shape.build_map(true);
        prop_assert!(forward == backward);
        prop_assert_eq!(hash_of(&forward), hash_of(&backward));
        prop_assert_eq!(forward.subtree_size(), backward.subtree_size());
    }
}
