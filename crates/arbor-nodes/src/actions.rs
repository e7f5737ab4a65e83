//! Action nodes: host side effects, returning `Success`/`Failure`
//! immediately or `Running` for multi-tick work.

use serde_json::Value as Json;
use tracing::warn;

use arbor_bt::{
    require, EvalContext, JsonMap, LeafNode, NodeKind, NodeRegistry, NodeSpec, NodeState,
    ParamSpec, ParamType, TreeError,
};
use arbor_core::{BtValue, Capability, EntityId, SpawnAnchor, Vec2};

use crate::param::{
    enum_str, invalid, optional_entity_ref, optional_entity_ref_to_json, NumberPair,
};

pub(crate) fn register(registry: &mut NodeRegistry) {
    registry.register(&MOVE_IN_DIRECTION_SPEC, || Box::new(MoveInDirection::new()));
    registry.register(&JUMP_SPEC, || Box::new(Jump::new()));
    registry.register(&WAIT_SECONDS_SPEC, || Box::new(WaitSeconds::new()));
    registry.register(&SPAWN_ENTITY_SPEC, || Box::new(SpawnEntity::new()));
    registry.register(&DESTROY_SELF_SPEC, || Box::new(DestroySelf::new()));
    registry.register(&DESTROY_TARGET_SPEC, || Box::new(DestroyTarget::new()));
    registry.register(&INCREASE_VARIABLE_SPEC, || Box::new(IncreaseVariable::new()));
    registry.register(&WIN_SPEC, || Box::new(Win::new()));
    registry.register(&LOSE_SPEC, || Box::new(Lose::new()));
}

static MOVE_IN_DIRECTION_SPEC: NodeSpec = NodeSpec {
    name: "MoveInDirection",
    kind: NodeKind::Action,
    description: "Moves the entity horizontally in the given direction, using the specified move speed.",
    params: &[
        ParamSpec::required("direction", ParamType::Custom("left|right")),
        ParamSpec::required("moveSpeed", ParamType::FloatOrVar),
    ],
    requires: &[Capability::Movement],
};

/// Horizontal movement through the movement capability.
pub struct MoveInDirection {
    direction: Vec2,
    direction_name: String,
    move_speed: BtValue<f32>,
}

impl MoveInDirection {
    pub fn new() -> Self {
        Self {
            direction: Vec2::new(1.0, 0.0),
            direction_name: "right".to_owned(),
            move_speed: BtValue::literal(3.0),
        }
    }
}

impl Default for MoveInDirection {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for MoveInDirection {
    fn spec(&self) -> &'static NodeSpec {
        &MOVE_IN_DIRECTION_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let speed = self.move_speed.get(&ctx.blackboard);
        ctx.host.move_toward(ctx.entity, self.direction, speed);
        NodeState::Success
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        let direction = enum_str(params, &MOVE_IN_DIRECTION_SPEC, "direction")?;
        self.direction = match direction {
            "left" => Vec2::new(-1.0, 0.0),
            "right" => Vec2::new(1.0, 0.0),
            _ => return Err(invalid(&MOVE_IN_DIRECTION_SPEC, "direction")),
        };
        self.direction_name = direction.to_owned();
        self.move_speed = BtValue::from_json(params.get("moveSpeed"), 3.0);
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("direction".into(), Json::from(self.direction_name.as_str()));
        params.insert("moveSpeed".into(), self.move_speed.to_json());
    }
}

static JUMP_SPEC: NodeSpec = NodeSpec {
    name: "Jump",
    kind: NodeKind::Action,
    description: "Makes the entity perform a jump action using the specified jump force.",
    params: &[ParamSpec::required("jumpForce", ParamType::FloatOrVar)],
    requires: &[Capability::Movement, Capability::Gravity],
};

pub struct Jump {
    jump_force: BtValue<f32>,
}

impl Jump {
    pub fn new() -> Self {
        Self {
            jump_force: BtValue::literal(1.0),
        }
    }
}

impl Default for Jump {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for Jump {
    fn spec(&self) -> &'static NodeSpec {
        &JUMP_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let force = self.jump_force.get(&ctx.blackboard);
        ctx.host.jump(ctx.entity, force);
        NodeState::Success
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.jump_force = BtValue::from_json(params.get("jumpForce"), 1.0);
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("jumpForce".into(), self.jump_force.to_json());
    }
}

static WAIT_SECONDS_SPEC: NodeSpec = NodeSpec {
    name: "WaitSeconds",
    kind: NodeKind::Action,
    description: "Waits for a specified number of seconds. Returns Success when the time has passed. Returns Running while waiting.",
    params: &[ParamSpec::required("seconds", ParamType::FloatOrVar)],
    requires: &[],
};

/// Multi-tick wait. Elapsed time is explicit per-node state accumulated from
/// `dt_seconds`; reaching the target resolves `Success` exactly once and
/// restarts the window.
pub struct WaitSeconds {
    seconds: BtValue<f32>,
    elapsed: f32,
}

impl WaitSeconds {
    pub fn new() -> Self {
        Self {
            seconds: BtValue::literal(0.0),
            elapsed: 0.0,
        }
    }
}

impl Default for WaitSeconds {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for WaitSeconds {
    fn spec(&self) -> &'static NodeSpec {
        &WAIT_SECONDS_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let target = self.seconds.get(&ctx.blackboard);
        self.elapsed += ctx.tick.dt_seconds;
        if self.elapsed >= target {
            self.elapsed = 0.0;
            NodeState::Success
        } else {
            NodeState::Running
        }
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.seconds = BtValue::from_json(params.get("seconds"), 0.0);
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("seconds".into(), self.seconds.to_json());
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

static SPAWN_ENTITY_SPEC: NodeSpec = NodeSpec {
    name: "SpawnEntity",
    kind: NodeKind::Action,
    description: "Spawns an entity from a preset at the specified spawn point. If spawnPoint is not specified, the entity will be spawned at the current position of the entity with this node.",
    params: &[
        ParamSpec::required("presetId", ParamType::Str),
        ParamSpec::optional("spawnPoint", ParamType::EntityVar),
        ParamSpec::optional("spawnedEntity", ParamType::EntityVar),
    ],
    requires: &[],
};

pub struct SpawnEntity {
    preset_id: BtValue<String>,
    spawn_point: Option<BtValue<Option<EntityId>>>,
    spawned_entity: Option<BtValue<Option<EntityId>>>,
}

impl SpawnEntity {
    pub fn new() -> Self {
        Self {
            preset_id: BtValue::literal(String::new()),
            spawn_point: None,
            spawned_entity: None,
        }
    }
}

impl Default for SpawnEntity {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for SpawnEntity {
    fn spec(&self) -> &'static NodeSpec {
        &SPAWN_ENTITY_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let preset = self.preset_id.get(&ctx.blackboard);
        let anchor = match self.spawn_point.as_ref().and_then(|p| p.get(&ctx.blackboard)) {
            Some(point) => SpawnAnchor::AtEntity(point),
            None => SpawnAnchor::AtEntity(ctx.entity),
        };
        match ctx.host.spawn_from_preset(&preset, anchor) {
            Some(spawned) => {
                if let Some(output) = &self.spawned_entity {
                    output.set(&mut ctx.blackboard, Some(spawned));
                }
                NodeState::Success
            }
            None => {
                warn!(preset = %preset, "spawn preset not found");
                NodeState::Failure
            }
        }
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        let token = require(params, &SPAWN_ENTITY_SPEC, "presetId")?;
        self.preset_id = BtValue::from_json(Some(token), String::new());
        self.spawn_point = optional_entity_ref(params, "spawnPoint");
        self.spawned_entity = optional_entity_ref(params, "spawnedEntity");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("presetId".into(), self.preset_id.to_json());
        params.insert(
            "spawnPoint".into(),
            optional_entity_ref_to_json(&self.spawn_point),
        );
        params.insert(
            "spawnedEntity".into(),
            optional_entity_ref_to_json(&self.spawned_entity),
        );
    }
}

static DESTROY_SELF_SPEC: NodeSpec = NodeSpec {
    name: "DestroySelf",
    kind: NodeKind::Action,
    description: "Destroys the current entity (the object with this node).",
    params: &[],
    requires: &[],
};

pub struct DestroySelf;

impl DestroySelf {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DestroySelf {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for DestroySelf {
    fn spec(&self) -> &'static NodeSpec {
        &DESTROY_SELF_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        ctx.host.destroy(ctx.entity);
        NodeState::Success
    }

    fn load(&mut self, _params: &JsonMap) -> Result<(), TreeError> {
        Ok(())
    }

    fn save(&self, _params: &mut JsonMap) {}
}

static DESTROY_TARGET_SPEC: NodeSpec = NodeSpec {
    name: "DestroyTarget",
    kind: NodeKind::Action,
    description: "Destroys the target entity.",
    params: &[ParamSpec::optional("target", ParamType::EntityVar)],
    requires: &[],
};

pub struct DestroyTarget {
    target: Option<BtValue<Option<EntityId>>>,
}

impl DestroyTarget {
    pub fn new() -> Self {
        Self { target: None }
    }
}

impl Default for DestroyTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for DestroyTarget {
    fn spec(&self) -> &'static NodeSpec {
        &DESTROY_TARGET_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let Some(target) = self.target.as_ref().and_then(|t| t.get(&ctx.blackboard)) else {
            return NodeState::Failure;
        };
        ctx.host.destroy(target);
        NodeState::Success
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.target = optional_entity_ref(params, "target");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("target".into(), optional_entity_ref_to_json(&self.target));
    }
}

static INCREASE_VARIABLE_SPEC: NodeSpec = NodeSpec {
    name: "IncreaseVariable",
    kind: NodeKind::Action,
    description: "Increases a variable by a value and returns Success. Minus amount is also possible.",
    params: &[
        ParamSpec::required("variable", ParamType::Custom("only {i_var}|only {f_var}")),
        ParamSpec::required("amount", ParamType::Custom("int_or_{i_var}|float_or_{f_var}")),
    ],
    requires: &[],
};

/// Adds `amount` to a numeric variable. The variable key's type tag picks
/// int or float arithmetic at load time.
pub struct IncreaseVariable {
    pair: Option<NumberPair>,
}

impl IncreaseVariable {
    pub fn new() -> Self {
        Self { pair: None }
    }
}

impl Default for IncreaseVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for IncreaseVariable {
    fn spec(&self) -> &'static NodeSpec {
        &INCREASE_VARIABLE_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        match &self.pair {
            Some(NumberPair::Int { variable, value }) => {
                let sum = variable.get(&ctx.blackboard) + value.get(&ctx.blackboard);
                variable.set(&mut ctx.blackboard, sum);
            }
            Some(NumberPair::Float { variable, value }) => {
                let sum = variable.get(&ctx.blackboard) + value.get(&ctx.blackboard);
                variable.set(&mut ctx.blackboard, sum);
            }
            None => return NodeState::Failure,
        }
        NodeState::Success
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.pair = Some(NumberPair::load(
            params,
            &INCREASE_VARIABLE_SPEC,
            "variable",
            "amount",
        )?);
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        if let Some(pair) = &self.pair {
            pair.save(params, "variable", "amount");
        }
    }
}

static WIN_SPEC: NodeSpec = NodeSpec {
    name: "Win",
    kind: NodeKind::Action,
    description: "Makes the entity win the game.",
    params: &[],
    requires: &[],
};

/// Signals a win. Succeeds only on the first call to take effect, so a
/// one-shot trigger composes naturally.
pub struct Win;

impl Win {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Win {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for Win {
    fn spec(&self) -> &'static NodeSpec {
        &WIN_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        if ctx.host.win() {
            NodeState::Success
        } else {
            NodeState::Failure
        }
    }

    fn load(&mut self, _params: &JsonMap) -> Result<(), TreeError> {
        Ok(())
    }

    fn save(&self, _params: &mut JsonMap) {}
}

static LOSE_SPEC: NodeSpec = NodeSpec {
    name: "Lose",
    kind: NodeKind::Action,
    description: "Makes the entity lose the game.",
    params: &[],
    requires: &[],
};

pub struct Lose;

impl Lose {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Lose {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for Lose {
    fn spec(&self) -> &'static NodeSpec {
        &LOSE_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        if ctx.host.lose() {
            NodeState::Success
        } else {
            NodeState::Failure
        }
    }

    fn load(&mut self, _params: &JsonMap) -> Result<(), TreeError> {
        Ok(())
    }

    fn save(&self, _params: &mut JsonMap) {}
}
