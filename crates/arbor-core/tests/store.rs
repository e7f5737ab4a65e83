use arbor_core::{Blackboard, EntityId, VarStore};
use serde_json::json;

#[test]
fn set_get_roundtrip_per_type() {
    let mut instance = VarStore::new();
    let mut global = VarStore::new();
    let mut bb = Blackboard::new(&mut instance, &mut global);

    bb.set("i_health", 10);
    bb.set("f_speed", 3.5f32);
    bb.set("b_alive", true);
    bb.set("s_name", "slime".to_string());
    bb.set("e_target", Some(EntityId(7)));

    assert_eq!(bb.get("i_health", 0), 10);
    assert_eq!(bb.get("f_speed", 0.0f32), 3.5);
    assert!(bb.get("b_alive", false));
    assert_eq!(bb.get("s_name", String::new()), "slime");
    assert_eq!(bb.get("e_target", None), Some(EntityId(7)));
}

#[test]
fn mismatched_read_returns_default_without_panic() {
    let mut instance = VarStore::new();
    let mut global = VarStore::new();
    let mut bb = Blackboard::new(&mut instance, &mut global);

    bb.set("i_health", 10);
    assert_eq!(bb.get("i_health", 0), 10);
    assert_eq!(bb.get("i_health", -1.0f32), -1.0);
}

#[test]
fn missing_key_returns_default() {
    let mut instance = VarStore::new();
    let mut global = VarStore::new();
    let bb = Blackboard::new(&mut instance, &mut global);

    assert_eq!(bb.get("i_missing", 42), 42);
    assert!(!bb.has("i_missing"));
}

#[test]
fn global_prefix_routes_to_shared_store() {
    let mut global = VarStore::new();

    let mut first = VarStore::new();
    Blackboard::new(&mut first, &mut global).set("g_s_level", "forest".to_string());

    // A fresh instance store with no prior writes still sees the global.
    let mut second = VarStore::new();
    let bb = Blackboard::new(&mut second, &mut global);
    assert_eq!(bb.get("g_s_level", String::new()), "forest");
    assert!(second.is_empty());
}

#[test]
fn load_from_json_converts_by_prefix() {
    let mut instance = VarStore::new();
    let mut global = VarStore::new();
    let mut bb = Blackboard::new(&mut instance, &mut global);

    let vars = json!({
        "i_lives": 3,
        "f_gravity": -9.8,
        "b_paused": false,
        "s_title": "cave",
        "e_boss": "anything"
    });
    bb.load_from_json(vars.as_object().unwrap());

    assert_eq!(bb.get("i_lives", 0), 3);
    assert_eq!(bb.get("f_gravity", 0.0f32), -9.8);
    assert!(!bb.get("b_paused", true));
    assert_eq!(bb.get("s_title", String::new()), "cave");
    // Entity keys always initialize unresolved, whatever the token says.
    assert!(bb.has("e_boss"));
    assert_eq!(bb.get("e_boss", Some(EntityId(1))), None);
}

#[test]
fn load_global_resets_previous_contents() {
    let mut global = VarStore::new();
    let mut instance = VarStore::new();
    let mut bb = Blackboard::new(&mut instance, &mut global);

    bb.set("g_i_round", 5);
    bb.load_global_from_json(json!({ "g_s_level": "forest" }).as_object().unwrap());

    assert!(!bb.has("g_i_round"));
    assert_eq!(bb.get("g_s_level", String::new()), "forest");
}

#[test]
fn untagged_keys_are_skipped() {
    let mut instance = VarStore::new();
    let mut global = VarStore::new();
    let mut bb = Blackboard::new(&mut instance, &mut global);

    bb.load_from_json(json!({ "health": 10, "i_health": 10 }).as_object().unwrap());
    assert!(!bb.has("health"));
    assert_eq!(bb.get("i_health", 0), 10);
}
