use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Minimal 2D vector for movement and spawn positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Host-side components a node needs on its owning entity.
///
/// Leaf nodes declare these in their metadata; the host resolves the union
/// across the whole tree before the first tick, so nodes do not have to
/// guard against a missing capability on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    Movement,
    Gravity,
    CollisionSensor,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Capability::Movement => "Movement",
            Capability::Gravity => "Gravity",
            Capability::CollisionSensor => "CollisionSensor",
        }
    }
}

/// Contact lifecycle phase a collision query matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPhase {
    Enter,
    Stay,
    Exit,
}

impl ContactPhase {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "enter" => Some(ContactPhase::Enter),
            "stay" => Some(ContactPhase::Stay),
            "exit" => Some(ContactPhase::Exit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactPhase::Enter => "enter",
            ContactPhase::Stay => "stay",
            ContactPhase::Exit => "exit",
        }
    }
}

/// Direction a contact normal must roughly point, from the queried entity's
/// point of view (`Down` matches standing on something).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactDirection {
    Up,
    Down,
    Left,
    Right,
    Any,
}

impl ContactDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(ContactDirection::Up),
            "down" => Some(ContactDirection::Down),
            "left" => Some(ContactDirection::Left),
            "right" => Some(ContactDirection::Right),
            "any" => Some(ContactDirection::Any),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactDirection::Up => "up",
            ContactDirection::Down => "down",
            ContactDirection::Left => "left",
            ContactDirection::Right => "right",
            ContactDirection::Any => "any",
        }
    }
}

/// Where a spawned entity lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnAnchor {
    AtEntity(EntityId),
    AtPosition(Vec2),
}

/// Directional movement and impulses.
pub trait MovementHost {
    fn move_toward(&mut self, entity: EntityId, direction: Vec2, speed: f32);
    fn jump(&mut self, entity: EntityId, impulse: f32);
    fn velocity(&self, entity: EntityId) -> Vec2;
}

/// Recent-contact queries against the host's collision memory.
///
/// How long a contact stays observable per phase is a host tunable, not an
/// interpreter contract.
pub trait ContactHost {
    fn recent_contact(
        &self,
        entity: EntityId,
        phase: ContactPhase,
        direction: ContactDirection,
        tags: &[String],
    ) -> Option<EntityId>;
}

/// Entity creation and (deferred) destruction.
///
/// `destroy` marks; the host sweeps after the tick. `is_destroyed` observes
/// the mark within the same tick so trees can react before the sweep.
pub trait LifecycleHost {
    fn spawn_from_preset(&mut self, preset_id: &str, anchor: SpawnAnchor) -> Option<EntityId>;
    fn destroy(&mut self, entity: EntityId);
    fn is_destroyed(&self, entity: EntityId) -> bool;
    fn position(&self, entity: EntityId) -> Option<Vec2>;
}

/// Game-outcome signaling. Both calls are idempotent and report whether
/// this was the first call to take effect.
pub trait OutcomeHost {
    fn win(&mut self) -> bool;
    fn lose(&mut self) -> bool;
}

/// The single seam the interpreter sees.
pub trait Host: MovementHost + ContactHost + LifecycleHost + OutcomeHost {}

impl<T: MovementHost + ContactHost + LifecycleHost + OutcomeHost> Host for T {}
