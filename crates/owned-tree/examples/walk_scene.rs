//! CLI example that builds a small scene hierarchy and walks it
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example walk_scene
//!
//! Shows the three traversal orders, a depth-limited walk, reparenting, and
//! how a cyclic reparent is rejected without touching the tree.

use anyhow::Result;
use log::{info, warn};
use owned_tree::prelude::*;

fn build_scene() -> Result<ListTreeNode<String>> {
    let actor = |name: &str| ListTreeNode::new(name.to_string());

    let camera = actor("camera");
    let terrain =
        ListTreeNode::with_children("terrain".to_string(), [actor("rock"), actor("tree")])?;
    let player = ListTreeNode::with_children("player".to_string(), [actor("weapon")])?;
    let world = ListTreeNode::with_children("world".to_string(), [terrain, player])?;

    Ok(ListTreeNode::with_children("scene".to_string(), [camera, world])?)
}

fn print_walk(title: &str, walker: TreeWalker<String, NodeList<String>>) {
    let names: Vec<String> = walker.map(|node| node.value().clone()).collect();
    println!("{:<14} {}", title, names.join(" "));
}

fn main() -> Result<()> {
    env_logger::init();

    let scene = build_scene()?;
    info!("Built scene with {} actors", scene.subtree_size());

    println!("Scene outline:");
    println!("{}", scene);
    println!();

    print_walk("pre-order:", scene.walk(TraversalOrder::PreOrder));
    print_walk("post-order:", scene.walk(TraversalOrder::PostOrder));
    print_walk("breadth-first:", scene.walk(TraversalOrder::BreadthFirst));
    print_walk(
        "top two levels:",
        scene.walk_with(WalkOptions::new().with_max_depth(1)),
    );
    println!();

    // Hand the weapon over to the camera rig.
    let weapon = scene
        .find(|name| name == "weapon")
        .ok_or_else(|| anyhow::anyhow!("weapon missing from scene"))?;
    let camera = scene.child(0)?;
    camera.set_children([weapon.clone()])?;
    let path: Vec<String> = weapon
        .path_from_root()
        .iter()
        .map(|node| node.value().clone())
        .collect();
    println!("weapon path:   {}", path.join(" / "));

    // Putting the whole scene under one of its own leaves must fail.
    let snapshot = scene.deep_copy();
    if let Err(err) = weapon.set_children([scene.clone()]) {
        warn!("Rejected reparent: {}", err);
        println!("rejected:      {}", err);
    }
    anyhow::ensure!(scene == snapshot, "rejected reparent modified the scene");

    println!();
    println!("Final outline:");
    println!("{}", scene);
    Ok(())
}
