//! Drives a JSON-authored tree against a toy host world and prints what the
//! runner observes each tick.
//!
//! ```sh
//! cargo run -p arbor-nodes --example platformer
//! ```

use std::collections::{BTreeMap, BTreeSet};

use arbor_bt::{build_tree, generate_node_docs, NodeRegistry, TreeRunner};
use arbor_core::{
    ContactDirection, ContactHost, ContactPhase, EntityId, LifecycleHost, MovementHost,
    OutcomeHost, SpawnAnchor, TickContext, VarStore, Vec2,
};
use arbor_nodes::register_defaults;
use serde_json::json;

#[derive(Default)]
struct DemoWorld {
    next_id: u64,
    positions: BTreeMap<EntityId, Vec2>,
    velocities: BTreeMap<EntityId, Vec2>,
    grounded: BTreeSet<EntityId>,
    doomed: BTreeSet<EntityId>,
    outcome: Option<&'static str>,
}

impl DemoWorld {
    fn add_entity(&mut self, position: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.positions.insert(id, position);
        id
    }
}

impl MovementHost for DemoWorld {
    fn move_toward(&mut self, entity: EntityId, direction: Vec2, speed: f32) {
        if let Some(position) = self.positions.get_mut(&entity) {
            position.x += direction.x * speed * (1.0 / 60.0);
        }
    }

    fn jump(&mut self, entity: EntityId, impulse: f32) {
        self.velocities
            .insert(entity, Vec2::new(0.0, impulse));
        self.grounded.remove(&entity);
        println!("  -> jump! impulse {impulse}");
    }

    fn velocity(&self, entity: EntityId) -> Vec2 {
        self.velocities.get(&entity).copied().unwrap_or_default()
    }
}

impl ContactHost for DemoWorld {
    fn recent_contact(
        &self,
        entity: EntityId,
        phase: ContactPhase,
        direction: ContactDirection,
        tags: &[String],
    ) -> Option<EntityId> {
        let on_ground = phase == ContactPhase::Stay
            && direction == ContactDirection::Down
            && tags.iter().any(|t| t == "Ground")
            && self.grounded.contains(&entity);
        on_ground.then_some(entity)
    }
}

impl LifecycleHost for DemoWorld {
    fn spawn_from_preset(&mut self, _preset_id: &str, anchor: SpawnAnchor) -> Option<EntityId> {
        let position = match anchor {
            SpawnAnchor::AtEntity(at) => self.positions.get(&at).copied().unwrap_or_default(),
            SpawnAnchor::AtPosition(position) => position,
        };
        Some(self.add_entity(position))
    }

    fn destroy(&mut self, entity: EntityId) {
        self.doomed.insert(entity);
    }

    fn is_destroyed(&self, entity: EntityId) -> bool {
        self.doomed.contains(&entity)
    }

    fn position(&self, entity: EntityId) -> Option<Vec2> {
        self.positions.get(&entity).copied()
    }
}

impl OutcomeHost for DemoWorld {
    fn win(&mut self) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some("win");
        true
    }

    fn lose(&mut self) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some("lose");
        true
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut registry = NodeRegistry::new();
    register_defaults(&mut registry);

    println!("=== available nodes ===");
    print!("{}", generate_node_docs(&registry));

    // Hop whenever grounded, wait a beat between hops.
    let authored = json!({
        "type": "composite",
        "name": "Sequence",
        "children": [
            { "type": "condition", "name": "IsOnGround" },
            { "type": "action", "name": "Jump", "jumpForce": "{f_hop}" },
            { "type": "action", "name": "WaitSeconds", "seconds": 0.05 }
        ]
    });

    let mut world = DemoWorld::default();
    let player = world.add_entity(Vec2::default());
    world.grounded.insert(player);

    let tree = build_tree(&registry, &authored).expect("authored tree must build");
    let mut runner = TreeRunner::new(player, tree);
    let mut global = VarStore::new();
    runner.load_vars_from_json(&mut global, json!({ "f_hop": 4.0 }).as_object().unwrap());

    println!("\n=== requirements: {:?} ===", runner.required_capabilities());

    println!("\n=== ticking ===");
    for tick in 0..6u64 {
        let ctx = TickContext::new(tick, 1.0 / 60.0);
        let state = runner.execute(&ctx, &mut global, &mut world);
        println!("tick {tick}: root -> {state:?}");
        for row in runner.snapshot() {
            println!(
                "  {}{} = {:?}",
                "  ".repeat(row.depth),
                row.name,
                row.state
            );
        }

        // Crude physics: land again two ticks after a jump.
        if world.velocity(player).y > 0.0 && tick % 2 == 1 {
            world.velocities.remove(&player);
            world.grounded.insert(player);
        }
    }
}
