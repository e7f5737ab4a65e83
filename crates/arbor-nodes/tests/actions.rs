mod common;

use arbor_bt::{build_tree, NodeRegistry, NodeState, TreeError, TreeRunner};
use arbor_core::{LifecycleHost, Vec2, VarStore};
use arbor_nodes::register_defaults;
use serde_json::json;

use common::{tick_at, SimHost};

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    register_defaults(&mut registry);
    registry
}

fn run_leaf(
    node: serde_json::Value,
    host: &mut SimHost,
    global: &mut VarStore,
) -> (TreeRunner, NodeState) {
    let entity = host.add_entity(Vec2::default());
    let mut runner = TreeRunner::new(entity, build_tree(&registry(), &node).unwrap());
    let state = runner.execute(&tick_at(0), global, host);
    (runner, state)
}

#[test]
fn move_in_direction_uses_resolved_speed() {
    let mut host = SimHost::new();
    let mut global = VarStore::new();
    global.set("g_f_speed", 7.5f32);

    let (_, state) = run_leaf(
        json!({
            "type": "action",
            "name": "MoveInDirection",
            "direction": "left",
            "moveSpeed": "{g_f_speed}"
        }),
        &mut host,
        &mut global,
    );

    assert_eq!(state, NodeState::Success);
    let (_, direction, speed) = host.moves[0];
    assert_eq!(direction, Vec2::new(-1.0, 0.0));
    assert_eq!(speed, 7.5);
}

#[test]
fn move_in_direction_rejects_unknown_direction() {
    let err = build_tree(
        &registry(),
        &json!({
            "type": "action",
            "name": "MoveInDirection",
            "direction": "sideways",
            "moveSpeed": 1.0
        }),
    );
    assert!(matches!(
        err,
        Err(TreeError::InvalidParam { node: "MoveInDirection", param: "direction" })
    ));
}

#[test]
fn increase_variable_int_accumulates() {
    let mut host = SimHost::new();
    let mut global = VarStore::new();
    let node = json!({
        "type": "action",
        "name": "IncreaseVariable",
        "variable": "{i_coins}",
        "amount": 3
    });

    let entity = host.add_entity(Vec2::default());
    let mut runner = TreeRunner::new(entity, build_tree(&registry(), &node).unwrap());
    runner.execute(&tick_at(0), &mut global, &mut host);
    runner.execute(&tick_at(1), &mut global, &mut host);

    assert_eq!(runner.vars().get("i_coins", 0), 6);
}

#[test]
fn increase_variable_float_with_negative_amount() {
    let mut host = SimHost::new();
    let mut global = VarStore::new();
    let node = json!({
        "type": "action",
        "name": "IncreaseVariable",
        "variable": "{f_health}",
        "amount": -0.5
    });

    let entity = host.add_entity(Vec2::default());
    let mut runner = TreeRunner::new(entity, build_tree(&registry(), &node).unwrap());
    runner.vars_mut().set("f_health", 2.0f32);
    runner.execute(&tick_at(0), &mut global, &mut host);

    assert_eq!(runner.vars().get("f_health", 0.0f32), 1.5);
}

#[test]
fn increase_variable_requires_a_typed_reference() {
    // A literal where the variable reference should be.
    let err = build_tree(
        &registry(),
        &json!({
            "type": "action",
            "name": "IncreaseVariable",
            "variable": 5,
            "amount": 1
        }),
    );
    assert!(matches!(
        err,
        Err(TreeError::InvalidParam { node: "IncreaseVariable", param: "variable" })
    ));

    // A reference whose key is not numeric.
    let err = build_tree(
        &registry(),
        &json!({
            "type": "action",
            "name": "IncreaseVariable",
            "variable": "{s_name}",
            "amount": 1
        }),
    );
    assert!(matches!(
        err,
        Err(TreeError::InvalidParam { node: "IncreaseVariable", param: "variable" })
    ));
}

#[test]
fn spawn_entity_at_spawn_point_and_records_output() {
    let mut host = SimHost::new().with_preset("coin");
    let mut global = VarStore::new();
    let marker = host.add_entity(Vec2::new(4.0, 2.0));

    let node = json!({
        "type": "action",
        "name": "SpawnEntity",
        "presetId": "coin",
        "spawnPoint": "{e_marker}",
        "spawnedEntity": "{e_spawned}"
    });
    let player = host.add_entity(Vec2::default());
    let mut runner = TreeRunner::new(player, build_tree(&registry(), &node).unwrap());
    runner.vars_mut().set("e_marker", Some(marker));

    let state = runner.execute(&tick_at(0), &mut global, &mut host);
    assert_eq!(state, NodeState::Success);

    let spawned = runner.vars().get("e_spawned", None).unwrap();
    assert_eq!(host.position(spawned), Some(Vec2::new(4.0, 2.0)));
    assert_eq!(host.spawns, [("coin".to_owned(), spawned)]);
}

#[test]
fn spawn_entity_falls_back_to_own_position() {
    let mut host = SimHost::new().with_preset("coin");
    let mut global = VarStore::new();

    let node = json!({ "type": "action", "name": "SpawnEntity", "presetId": "coin" });
    let player = host.add_entity(Vec2::new(1.0, 1.0));
    let mut runner = TreeRunner::new(player, build_tree(&registry(), &node).unwrap());

    assert_eq!(
        runner.execute(&tick_at(0), &mut global, &mut host),
        NodeState::Success
    );
    let (_, spawned) = host.spawns[0].clone();
    assert_eq!(host.position(spawned), Some(Vec2::new(1.0, 1.0)));
}

#[test]
fn spawn_entity_fails_on_unknown_preset() {
    let mut host = SimHost::new();
    let mut global = VarStore::new();
    let (_, state) = run_leaf(
        json!({ "type": "action", "name": "SpawnEntity", "presetId": "ghost" }),
        &mut host,
        &mut global,
    );
    assert_eq!(state, NodeState::Failure);
    assert!(host.spawns.is_empty());
}

#[test]
fn destroy_self_marks_the_owner() {
    let mut host = SimHost::new();
    let mut global = VarStore::new();
    let (runner, state) = run_leaf(
        json!({ "type": "action", "name": "DestroySelf" }),
        &mut host,
        &mut global,
    );
    assert_eq!(state, NodeState::Success);
    assert!(host.is_destroyed(runner.entity()));
}

#[test]
fn destroy_target_without_target_fails() {
    let mut host = SimHost::new();
    let mut global = VarStore::new();
    let (_, state) = run_leaf(
        json!({ "type": "action", "name": "DestroyTarget", "target": "{e_target}" }),
        &mut host,
        &mut global,
    );
    assert_eq!(state, NodeState::Failure);
    assert!(host.doomed.is_empty());
}

#[test]
fn win_and_lose_are_idempotent() {
    let mut host = SimHost::new();
    let mut global = VarStore::new();

    let (_, first) = run_leaf(
        json!({ "type": "action", "name": "Win" }),
        &mut host,
        &mut global,
    );
    assert_eq!(first, NodeState::Success);
    assert_eq!(host.outcome, Some("win"));

    // The outcome is already decided: both signals now fail.
    let (_, again) = run_leaf(
        json!({ "type": "action", "name": "Win" }),
        &mut host,
        &mut global,
    );
    assert_eq!(again, NodeState::Failure);

    let (_, lose) = run_leaf(
        json!({ "type": "action", "name": "Lose" }),
        &mut host,
        &mut global,
    );
    assert_eq!(lose, NodeState::Failure);
    assert_eq!(host.outcome, Some("win"));
}
