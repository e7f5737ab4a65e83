//! A small in-memory host world for exercising the node catalog end to end:
//! scripted collision memory, deferred destruction, recorded side effects.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use arbor_core::{
    ContactDirection, ContactHost, ContactPhase, EntityId, LifecycleHost, MovementHost,
    OutcomeHost, SpawnAnchor, TickContext, Vec2,
};

#[derive(Debug, Clone)]
pub struct Contact {
    pub entity: EntityId,
    pub phase: ContactPhase,
    pub direction: ContactDirection,
    pub tags: Vec<String>,
    pub other: EntityId,
}

#[derive(Debug, Default)]
pub struct SimHost {
    next_id: u64,
    pub presets: BTreeSet<String>,
    pub positions: BTreeMap<EntityId, Vec2>,
    pub velocities: BTreeMap<EntityId, Vec2>,
    pub contacts: Vec<Contact>,
    pub doomed: BTreeSet<EntityId>,
    pub jumps: Vec<(EntityId, f32)>,
    pub moves: Vec<(EntityId, Vec2, f32)>,
    pub spawns: Vec<(String, EntityId)>,
    pub outcome: Option<&'static str>,
}

impl SimHost {
    pub fn new() -> Self {
        Self {
            next_id: 100,
            ..Self::default()
        }
    }

    pub fn with_preset(mut self, preset: &str) -> Self {
        self.presets.insert(preset.to_owned());
        self
    }

    pub fn add_entity(&mut self, position: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.positions.insert(id, position);
        id
    }

    pub fn push_contact(
        &mut self,
        entity: EntityId,
        phase: ContactPhase,
        direction: ContactDirection,
        tags: &[&str],
        other: EntityId,
    ) {
        self.contacts.push(Contact {
            entity,
            phase,
            direction,
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            other,
        });
    }

    /// End-of-tick sweep: contact memory decays, destruction marks resolve.
    /// Both windows are host tunables, not interpreter contracts.
    pub fn sweep(&mut self) {
        self.contacts.clear();
        for id in std::mem::take(&mut self.doomed) {
            self.positions.remove(&id);
            self.velocities.remove(&id);
        }
    }
}

impl MovementHost for SimHost {
    fn move_toward(&mut self, entity: EntityId, direction: Vec2, speed: f32) {
        self.moves.push((entity, direction, speed));
    }

    fn jump(&mut self, entity: EntityId, impulse: f32) {
        self.jumps.push((entity, impulse));
    }

    fn velocity(&self, entity: EntityId) -> Vec2 {
        self.velocities.get(&entity).copied().unwrap_or_default()
    }
}

impl ContactHost for SimHost {
    fn recent_contact(
        &self,
        entity: EntityId,
        phase: ContactPhase,
        direction: ContactDirection,
        tags: &[String],
    ) -> Option<EntityId> {
        self.contacts
            .iter()
            .find(|c| {
                c.entity == entity
                    && c.phase == phase
                    && (direction == ContactDirection::Any || c.direction == direction)
                    && (tags.is_empty() || c.tags.iter().any(|t| tags.contains(t)))
            })
            .map(|c| c.other)
    }
}

impl LifecycleHost for SimHost {
    fn spawn_from_preset(&mut self, preset_id: &str, anchor: SpawnAnchor) -> Option<EntityId> {
        if !self.presets.contains(preset_id) {
            return None;
        }
        let position = match anchor {
            SpawnAnchor::AtEntity(at) => self.positions.get(&at).copied().unwrap_or_default(),
            SpawnAnchor::AtPosition(position) => position,
        };
        let id = self.add_entity(position);
        self.spawns.push((preset_id.to_owned(), id));
        Some(id)
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

impl OutcomeHost for SimHost {
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

pub fn tick_at(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1)
}
