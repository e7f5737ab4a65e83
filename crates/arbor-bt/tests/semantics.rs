mod common;

use arbor_bt::{CompositeKind, DecoratorKind, NodeState, Tree, TreeRunner};
use arbor_core::{EntityId, VarStore};

use common::{new_log, tick, NullHost, Probe};

fn run_once(tree: Tree) -> NodeState {
    let mut runner = TreeRunner::new(EntityId(1), tree);
    let mut global = VarStore::new();
    runner.execute(&tick(), &mut global, &mut NullHost)
}

#[test]
fn selector_short_circuits_on_success() {
    use NodeState::{Failure, Running, Success};

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_composite(CompositeKind::Selector);
    for (label, state) in [("a", Failure), ("b", Failure), ("c", Success), ("d", Running)] {
        let child = tree.add_leaf(Probe::always(label, state, &log));
        tree.attach(root, child);
    }
    tree.set_root(root);

    assert_eq!(run_once(tree), Success);
    // The fourth child is never evaluated.
    assert_eq!(*log.borrow(), ["a", "b", "c"]);
}

#[test]
fn selector_short_circuits_on_running() {
    use NodeState::{Failure, Running, Success};

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_composite(CompositeKind::Selector);
    for (label, state) in [("a", Failure), ("b", Running), ("c", Success)] {
        let child = tree.add_leaf(Probe::always(label, state, &log));
        tree.attach(root, child);
    }
    tree.set_root(root);

    assert_eq!(run_once(tree), Running);
    assert_eq!(*log.borrow(), ["a", "b"]);
}

#[test]
fn sequence_short_circuits_on_failure() {
    use NodeState::{Failure, Success};

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_composite(CompositeKind::Sequence);
    for (label, state) in [("a", Success), ("b", Success), ("c", Failure), ("d", Success)] {
        let child = tree.add_leaf(Probe::always(label, state, &log));
        tree.attach(root, child);
    }
    tree.set_root(root);

    assert_eq!(run_once(tree), Failure);
    assert_eq!(*log.borrow(), ["a", "b", "c"]);
}

#[test]
fn sequence_succeeds_only_when_all_children_do() {
    use NodeState::Success;

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_composite(CompositeKind::Sequence);
    for label in ["a", "b", "c"] {
        let child = tree.add_leaf(Probe::always(label, Success, &log));
        tree.attach(root, child);
    }
    tree.set_root(root);

    assert_eq!(run_once(tree), Success);
    assert_eq!(*log.borrow(), ["a", "b", "c"]);
}

#[test]
fn empty_composites_fail() {
    for kind in [CompositeKind::Selector, CompositeKind::Sequence] {
        let mut tree = Tree::new();
        let root = tree.add_composite(kind);
        tree.set_root(root);
        assert_eq!(run_once(tree), NodeState::Failure);
    }
}

#[test]
fn decorator_kinds_transform_child_result() {
    use NodeState::{Failure, Running, Success};

    let cases = [
        (DecoratorKind::Invert, Success, Failure),
        (DecoratorKind::Invert, Failure, Success),
        (DecoratorKind::Invert, Running, Running),
        (DecoratorKind::Succeed, Failure, Success),
        (DecoratorKind::Succeed, Running, Running),
        (DecoratorKind::Fail, Success, Failure),
        (DecoratorKind::Fail, Running, Running),
    ];
    for (kind, inner, expected) in cases {
        let log = new_log();
        let mut tree = Tree::new();
        let root = tree.add_decorator(kind);
        let child = tree.add_leaf(Probe::always("child", inner, &log));
        tree.attach(root, child);
        tree.set_root(root);
        assert_eq!(run_once(tree), expected);
    }
}

#[test]
fn childless_decorator_fails_fast() {
    let mut tree = Tree::new();
    let root = tree.add_decorator(DecoratorKind::Invert);
    tree.set_root(root);
    assert_eq!(run_once(tree), NodeState::Failure);
}

#[test]
fn reparenting_clears_previous_link() {
    let log = new_log();
    let mut tree = Tree::new();
    let first = tree.add_composite(CompositeKind::Sequence);
    let second = tree.add_composite(CompositeKind::Sequence);
    let leaf = tree.add_leaf(Probe::always("leaf", NodeState::Success, &log));

    tree.attach(first, leaf);
    assert_eq!(tree.parent(leaf), Some(first));

    tree.attach(second, leaf);
    assert_eq!(tree.parent(leaf), Some(second));

    // The first parent lost the child, so it now evaluates as empty.
    tree.set_root(first);
    assert_eq!(run_once(tree), NodeState::Failure);
}

#[test]
fn nodes_are_reentrant_across_ticks() {
    use NodeState::{Running, Success};

    let log = new_log();
    let mut tree = Tree::new();
    let root = tree.add_composite(CompositeKind::Sequence);
    let child = tree.add_leaf(Probe::new("wait", &[Running, Running, Success], &log));
    tree.attach(root, child);
    tree.set_root(root);

    let mut runner = TreeRunner::new(EntityId(1), tree);
    let mut global = VarStore::new();
    assert_eq!(runner.execute(&tick(), &mut global, &mut NullHost), Running);
    assert_eq!(runner.execute(&tick(), &mut global, &mut NullHost), Running);
    assert_eq!(runner.execute(&tick(), &mut global, &mut NullHost), Success);
    // Terminal states are per-tick, not a lock: the next tick re-evaluates.
    assert_eq!(runner.execute(&tick(), &mut global, &mut NullHost), Success);
}
