mod common;

use arbor_bt::{CompositeKind, NodeState, Tree, TreeRunner};
use arbor_core::{EntityId, VarStore};

use common::{new_log, tick, NullHost, Probe};

#[test]
fn state_map_records_visited_nodes_only() {
    use NodeState::{Failure, Success};

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_composite(CompositeKind::Selector);
    let a = tree.add_leaf(Probe::always("a", Failure, &log));
    let b = tree.add_leaf(Probe::always("b", Success, &log));
    let c = tree.add_leaf(Probe::always("c", Success, &log));
    for child in [a, b, c] {
        tree.attach(root, child);
    }
    tree.set_root(root);

    let mut runner = TreeRunner::new(EntityId(1), tree);

    // Pre-evaluation sentinel: nothing observed yet.
    assert_eq!(runner.state(root), None);
    assert_eq!(runner.state(a), None);

    let mut global = VarStore::new();
    runner.execute(&tick(), &mut global, &mut NullHost);

    assert_eq!(runner.state(root), Some(Success));
    assert_eq!(runner.state(a), Some(Failure));
    assert_eq!(runner.state(b), Some(Success));
    // Short-circuited past; still unobserved.
    assert_eq!(runner.state(c), None);
}

#[test]
fn snapshot_walks_preorder_with_depth() {
    use NodeState::Success;

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_composite(CompositeKind::Sequence);
    let inner = tree.add_composite(CompositeKind::Selector);
    let leaf = tree.add_leaf(Probe::always("leaf", Success, &log));
    tree.attach(root, inner);
    tree.attach(inner, leaf);
    tree.set_root(root);

    let mut runner = TreeRunner::new(EntityId(1), tree);
    let mut global = VarStore::new();
    runner.execute(&tick(), &mut global, &mut NullHost);

    let rows = runner.snapshot();
    let names: Vec<_> = rows.iter().map(|r| r.name).collect();
    let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
    assert_eq!(names, ["Sequence", "Selector", "Probe"]);
    assert_eq!(depths, [0, 1, 2]);
    assert!(rows.iter().all(|r| r.state == Some(Success)));
}

#[test]
fn set_root_restarts_observation_and_leaf_state() {
    use NodeState::{Running, Success};

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_leaf(Probe::new("wait", &[Running, Success], &log));
    tree.set_root(root);

    let mut runner = TreeRunner::new(EntityId(1), tree);
    let mut global = VarStore::new();
    assert_eq!(runner.execute(&tick(), &mut global, &mut NullHost), Running);
    assert_eq!(runner.execute(&tick(), &mut global, &mut NullHost), Success);

    // Rebinding a fresh tree starts from scratch.
    let mut replacement = Tree::new();
    let new_root = replacement.add_leaf(Probe::new("wait", &[Running, Success], &log));
    replacement.set_root(new_root);
    runner.set_root(replacement);

    assert_eq!(runner.state(new_root), None);
    assert_eq!(runner.execute(&tick(), &mut global, &mut NullHost), Running);
}

#[test]
fn empty_tree_fails_without_panicking() {
    let runner_tree = Tree::new();
    let mut runner = TreeRunner::new(EntityId(1), runner_tree);
    let mut global = VarStore::new();
    assert_eq!(
        runner.execute(&tick(), &mut global, &mut NullHost),
        NodeState::Failure
    );
}
