//! Shared stubs for interpreter tests: a do-nothing host and a scripted
//! probe leaf that records evaluation order.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use arbor_bt::{EvalContext, JsonMap, LeafNode, NodeKind, NodeSpec, NodeState, TreeError};
use arbor_core::{
    ContactDirection, ContactHost, ContactPhase, EntityId, LifecycleHost, MovementHost,
    OutcomeHost, SpawnAnchor, TickContext, Vec2,
};

pub struct NullHost;

impl MovementHost for NullHost {
    fn move_toward(&mut self, _entity: EntityId, _direction: Vec2, _speed: f32) {}
    fn jump(&mut self, _entity: EntityId, _impulse: f32) {}
    fn velocity(&self, _entity: EntityId) -> Vec2 {
        Vec2::default()
    }
}

impl ContactHost for NullHost {
    fn recent_contact(
        &self,
        _entity: EntityId,
        _phase: ContactPhase,
        _direction: ContactDirection,
        _tags: &[String],
    ) -> Option<EntityId> {
        None
    }
}

impl LifecycleHost for NullHost {
    fn spawn_from_preset(&mut self, _preset_id: &str, _anchor: SpawnAnchor) -> Option<EntityId> {
        None
    }
    fn destroy(&mut self, _entity: EntityId) {}
    fn is_destroyed(&self, _entity: EntityId) -> bool {
        false
    }
    fn position(&self, _entity: EntityId) -> Option<Vec2> {
        None
    }
}

impl OutcomeHost for NullHost {
    fn win(&mut self) -> bool {
        true
    }
    fn lose(&mut self) -> bool {
        true
    }
}

pub type EvalLog = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> EvalLog {
    Rc::new(RefCell::new(Vec::new()))
}

static PROBE_SPEC: NodeSpec = NodeSpec {
    name: "Probe",
    kind: NodeKind::Action,
    description: "",
    params: &[],
    requires: &[],
};

/// Returns a scripted sequence of states (the last one repeats) and records
/// each evaluation in a shared log.
pub struct Probe {
    label: String,
    states: Vec<NodeState>,
    cursor: usize,
    log: EvalLog,
}

impl Probe {
    pub fn new(label: &str, states: &[NodeState], log: &EvalLog) -> Box<Self> {
        Box::new(Self {
            label: label.to_owned(),
            states: states.to_vec(),
            cursor: 0,
            log: Rc::clone(log),
        })
    }

    pub fn always(label: &str, state: NodeState, log: &EvalLog) -> Box<Self> {
        Self::new(label, &[state], log)
    }
}

impl LeafNode for Probe {
    fn spec(&self) -> &'static NodeSpec {
        &PROBE_SPEC
    }

    fn evaluate(&mut self, _ctx: &mut EvalContext<'_>) -> NodeState {
        self.log.borrow_mut().push(self.label.clone());
        let state = self.states[self.cursor.min(self.states.len() - 1)];
        self.cursor += 1;
        state
    }

    fn load(&mut self, _params: &JsonMap) -> Result<(), TreeError> {
        Ok(())
    }

    fn save(&self, _params: &mut JsonMap) {}

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

pub fn tick() -> TickContext {
    TickContext::new(0, 0.1)
}
