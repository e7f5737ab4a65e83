//! Condition nodes: predicates over the host and the variable store.
//! Conditions never mutate the game world and never return `Running`;
//! writing a matched entity or a comparison result back to the store is the
//! one sanctioned side effect.

use serde_json::Value as Json;

use arbor_bt::{
    EvalContext, JsonMap, LeafNode, NodeKind, NodeRegistry, NodeSpec, NodeState, ParamSpec,
    ParamType, TreeError,
};
use arbor_core::{BtValue, Capability, ContactDirection, ContactPhase, EntityId};

use crate::param::{
    enum_str, invalid, optional_bool_ref, optional_entity_ref, optional_entity_ref_to_json,
    reference_param, string_list, string_list_to_json, NumberPair,
};

pub(crate) fn register(registry: &mut NodeRegistry) {
    registry.register(&IS_ON_GROUND_SPEC, || Box::new(IsOnGround::new()));
    registry.register(&ON_HIT_SPEC, || Box::new(OnHit::new()));
    registry.register(&ON_STOMP_SPEC, || Box::new(OnStomp::new()));
    registry.register(&ON_DESTROYED_SPEC, || Box::new(OnDestroyed::new()));
    registry.register(&CHECK_COLLISION_SPEC, || Box::new(CheckCollision::new()));
    registry.register(&COMPARE_NUMBER_SPEC, || Box::new(CompareNumberVariable::new()));
    registry.register(&COMPARE_BOOL_SPEC, || Box::new(CompareBoolVariable::new()));
    registry.register(&COMPARE_STRING_SPEC, || Box::new(CompareStringVariable::new()));
    registry.register(&COMPARE_ENTITY_SPEC, || Box::new(CompareEntityVariable::new()));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "is_equal_to" => Some(CompareOp::Eq),
            "is_not_equal_to" => Some(CompareOp::Ne),
            "is_greater_than" => Some(CompareOp::Gt),
            "is_greater_than_or_equal_to" => Some(CompareOp::Ge),
            "is_less_than" => Some(CompareOp::Lt),
            "is_less_than_or_equal_to" => Some(CompareOp::Le),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "is_equal_to",
            CompareOp::Ne => "is_not_equal_to",
            CompareOp::Gt => "is_greater_than",
            CompareOp::Ge => "is_greater_than_or_equal_to",
            CompareOp::Lt => "is_less_than",
            CompareOp::Le => "is_less_than_or_equal_to",
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    fn compare<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
        }
    }
}

fn state_from(result: bool) -> NodeState {
    if result {
        NodeState::Success
    } else {
        NodeState::Failure
    }
}

static IS_ON_GROUND_SPEC: NodeSpec = NodeSpec {
    name: "IsOnGround",
    kind: NodeKind::Condition,
    description: "Returns Success if the entity's feet are touching an object with the 'Ground' tag.",
    params: &[],
    requires: &[Capability::CollisionSensor],
};

pub struct IsOnGround {
    ground: [String; 1],
}

impl IsOnGround {
    pub fn new() -> Self {
        Self {
            ground: ["Ground".to_owned()],
        }
    }
}

impl Default for IsOnGround {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for IsOnGround {
    fn spec(&self) -> &'static NodeSpec {
        &IS_ON_GROUND_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let contact = ctx.host.recent_contact(
            ctx.entity,
            ContactPhase::Stay,
            ContactDirection::Down,
            &self.ground,
        );
        state_from(contact.is_some())
    }

    fn load(&mut self, _params: &JsonMap) -> Result<(), TreeError> {
        Ok(())
    }

    fn save(&self, _params: &mut JsonMap) {}
}

static ON_HIT_SPEC: NodeSpec = NodeSpec {
    name: "OnHit",
    kind: NodeKind::Condition,
    description: "Returns Success if the entity's body (the object with this node) hits an object with the specified tags, saving the collided entity to the blackboard. Otherwise returns Failure. outputTarget is optional. Any direction is allowed.",
    params: &[
        ParamSpec::required("tags", ParamType::StringList),
        ParamSpec::optional("outputTarget", ParamType::EntityVar),
    ],
    requires: &[Capability::CollisionSensor],
};

pub struct OnHit {
    tags: Vec<String>,
    output_target: Option<BtValue<Option<EntityId>>>,
}

impl OnHit {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            output_target: None,
        }
    }
}

impl Default for OnHit {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for OnHit {
    fn spec(&self) -> &'static NodeSpec {
        &ON_HIT_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let hit = ctx.host.recent_contact(
            ctx.entity,
            ContactPhase::Enter,
            ContactDirection::Any,
            &self.tags,
        );
        let Some(hit) = hit else {
            return NodeState::Failure;
        };
        if let Some(output) = &self.output_target {
            output.set(&mut ctx.blackboard, Some(hit));
        }
        NodeState::Success
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.tags = string_list(params, &ON_HIT_SPEC, "tags")?;
        self.output_target = optional_entity_ref(params, "outputTarget");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("tags".into(), string_list_to_json(&self.tags));
        params.insert(
            "outputTarget".into(),
            optional_entity_ref_to_json(&self.output_target),
        );
    }
}

static ON_STOMP_SPEC: NodeSpec = NodeSpec {
    name: "OnStomp",
    kind: NodeKind::Condition,
    description: "Returns Success if the entity's feet (the object with this node) hits an object with the specified tags, saving the collided entity to the blackboard. Otherwise returns Failure. outputTarget is optional.",
    params: &[
        ParamSpec::required("tags", ParamType::StringList),
        ParamSpec::optional("outputTarget", ParamType::EntityVar),
    ],
    requires: &[Capability::Movement, Capability::CollisionSensor],
};

/// A stomp is a fresh downward contact while falling.
pub struct OnStomp {
    tags: Vec<String>,
    output_target: Option<BtValue<Option<EntityId>>>,
}

impl OnStomp {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            output_target: None,
        }
    }
}

impl Default for OnStomp {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for OnStomp {
    fn spec(&self) -> &'static NodeSpec {
        &ON_STOMP_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        if ctx.host.velocity(ctx.entity).y >= -0.01 {
            return NodeState::Failure;
        }
        let hit = ctx.host.recent_contact(
            ctx.entity,
            ContactPhase::Enter,
            ContactDirection::Down,
            &self.tags,
        );
        let Some(hit) = hit else {
            return NodeState::Failure;
        };
        if let Some(output) = &self.output_target {
            output.set(&mut ctx.blackboard, Some(hit));
        }
        NodeState::Success
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.tags = string_list(params, &ON_STOMP_SPEC, "tags")?;
        self.output_target = optional_entity_ref(params, "outputTarget");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("tags".into(), string_list_to_json(&self.tags));
        params.insert(
            "outputTarget".into(),
            optional_entity_ref_to_json(&self.output_target),
        );
    }
}

static ON_DESTROYED_SPEC: NodeSpec = NodeSpec {
    name: "OnDestroyed",
    kind: NodeKind::Condition,
    description: "Returns Success if the entity (this node is attached to) is destroyed. Returns Failure if the entity is not destroyed.",
    params: &[],
    requires: &[],
};

/// Observes the deferred-destruction mark before the host sweeps the
/// entity, so death reactions get one tick to run.
pub struct OnDestroyed;

impl OnDestroyed {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OnDestroyed {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for OnDestroyed {
    fn spec(&self) -> &'static NodeSpec {
        &ON_DESTROYED_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        state_from(ctx.host.is_destroyed(ctx.entity))
    }

    fn load(&mut self, _params: &JsonMap) -> Result<(), TreeError> {
        Ok(())
    }

    fn save(&self, _params: &mut JsonMap) {}
}

static CHECK_COLLISION_SPEC: NodeSpec = NodeSpec {
    name: "CheckCollision",
    kind: NodeKind::Condition,
    description: "Returns Success if a recent collision (of the specified type) matches the given direction and target tags, saving the collided entity to the blackboard. Otherwise returns Failure. outputTarget is optional.",
    params: &[
        ParamSpec::required("direction", ParamType::Custom("up|down|right|left|any")),
        ParamSpec::required("targetTags", ParamType::StringList),
        ParamSpec::required("collisionType", ParamType::Custom("enter|exit|stay")),
        ParamSpec::optional("outputTarget", ParamType::EntityVar),
    ],
    requires: &[Capability::CollisionSensor],
};

pub struct CheckCollision {
    direction: ContactDirection,
    phase: ContactPhase,
    target_tags: Vec<String>,
    output_target: Option<BtValue<Option<EntityId>>>,
}

impl CheckCollision {
    pub fn new() -> Self {
        Self {
            direction: ContactDirection::Any,
            phase: ContactPhase::Enter,
            target_tags: Vec::new(),
            output_target: None,
        }
    }
}

impl Default for CheckCollision {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for CheckCollision {
    fn spec(&self) -> &'static NodeSpec {
        &CHECK_COLLISION_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let hit = ctx
            .host
            .recent_contact(ctx.entity, self.phase, self.direction, &self.target_tags);
        let Some(hit) = hit else {
            return NodeState::Failure;
        };
        if let Some(output) = &self.output_target {
            output.set(&mut ctx.blackboard, Some(hit));
        }
        NodeState::Success
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.direction = enum_str(params, &CHECK_COLLISION_SPEC, "direction")
            .map(ContactDirection::parse)?
            .ok_or_else(|| invalid(&CHECK_COLLISION_SPEC, "direction"))?;
        self.phase = enum_str(params, &CHECK_COLLISION_SPEC, "collisionType")
            .map(ContactPhase::parse)?
            .ok_or_else(|| invalid(&CHECK_COLLISION_SPEC, "collisionType"))?;
        self.target_tags = string_list(params, &CHECK_COLLISION_SPEC, "targetTags")?;
        self.output_target = optional_entity_ref(params, "outputTarget");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("direction".into(), Json::from(self.direction.as_str()));
        params.insert("targetTags".into(), string_list_to_json(&self.target_tags));
        params.insert("collisionType".into(), Json::from(self.phase.as_str()));
        params.insert(
            "outputTarget".into(),
            optional_entity_ref_to_json(&self.output_target),
        );
    }
}

static COMPARE_NUMBER_SPEC: NodeSpec = NodeSpec {
    name: "CompareNumberVariable",
    kind: NodeKind::Condition,
    description: "Compares a number variable (int/float) with a value and returns Success if they match, otherwise returns Failure. resultTarget is for saving the result of the comparison.",
    params: &[
        ParamSpec::required("variable", ParamType::Custom("only {i_var}|only {f_var}")),
        ParamSpec::required(
            "operator",
            ParamType::Custom("is_equal_to|is_not_equal_to|is_greater_than|is_greater_than_or_equal_to|is_less_than|is_less_than_or_equal_to"),
        ),
        ParamSpec::required("value", ParamType::Custom("int_or_{i_var}|float_or_{f_var}")),
        ParamSpec::optional("resultTarget", ParamType::BoolVar),
    ],
    requires: &[],
};

pub struct CompareNumberVariable {
    pair: Option<NumberPair>,
    op: CompareOp,
    result_target: Option<BtValue<bool>>,
}

impl CompareNumberVariable {
    pub fn new() -> Self {
        Self {
            pair: None,
            op: CompareOp::Eq,
            result_target: None,
        }
    }
}

impl Default for CompareNumberVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for CompareNumberVariable {
    fn spec(&self) -> &'static NodeSpec {
        &COMPARE_NUMBER_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let result = match &self.pair {
            Some(NumberPair::Int { variable, value }) => self
                .op
                .compare(&variable.get(&ctx.blackboard), &value.get(&ctx.blackboard)),
            Some(NumberPair::Float { variable, value }) => self
                .op
                .compare(&variable.get(&ctx.blackboard), &value.get(&ctx.blackboard)),
            None => false,
        };
        if let Some(target) = &self.result_target {
            target.set(&mut ctx.blackboard, result);
        }
        state_from(result)
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        self.pair = Some(NumberPair::load(
            params,
            &COMPARE_NUMBER_SPEC,
            "variable",
            "value",
        )?);
        self.op = enum_str(params, &COMPARE_NUMBER_SPEC, "operator")
            .map(CompareOp::parse)?
            .ok_or_else(|| invalid(&COMPARE_NUMBER_SPEC, "operator"))?;
        self.result_target = optional_bool_ref(params, "resultTarget");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        if let Some(pair) = &self.pair {
            pair.save(params, "variable", "value");
        }
        params.insert("operator".into(), Json::from(self.op.as_str()));
        if let Some(target) = &self.result_target {
            params.insert("resultTarget".into(), target.to_json());
        }
    }
}

static COMPARE_BOOL_SPEC: NodeSpec = NodeSpec {
    name: "CompareBoolVariable",
    kind: NodeKind::Condition,
    description: "Compares a bool variable with a value and returns Success if they match, otherwise returns Failure. resultTarget is for saving the result of the comparison.",
    params: &[
        ParamSpec::required("variable", ParamType::BoolVar),
        ParamSpec::required("operator", ParamType::Custom("is_equal_to|is_not_equal_to")),
        ParamSpec::required("value", ParamType::BoolOrVar),
        ParamSpec::optional("resultTarget", ParamType::BoolVar),
    ],
    requires: &[],
};

pub struct CompareBoolVariable {
    variable: BtValue<bool>,
    op: CompareOp,
    value: BtValue<bool>,
    result_target: Option<BtValue<bool>>,
}

impl CompareBoolVariable {
    pub fn new() -> Self {
        Self {
            variable: BtValue::literal(false),
            op: CompareOp::Eq,
            value: BtValue::literal(false),
            result_target: None,
        }
    }
}

impl Default for CompareBoolVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for CompareBoolVariable {
    fn spec(&self) -> &'static NodeSpec {
        &COMPARE_BOOL_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let result = self.op.compare(
            &self.variable.get(&ctx.blackboard),
            &self.value.get(&ctx.blackboard),
        );
        if let Some(target) = &self.result_target {
            target.set(&mut ctx.blackboard, result);
        }
        state_from(result)
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        let (key, _) = reference_param(params, &COMPARE_BOOL_SPEC, "variable")?;
        self.variable = BtValue::reference(key, false);
        self.op = parse_equality_op(params, &COMPARE_BOOL_SPEC)?;
        self.value = BtValue::from_json(params.get("value"), false);
        self.result_target = optional_bool_ref(params, "resultTarget");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("variable".into(), self.variable.to_json());
        params.insert("operator".into(), Json::from(self.op.as_str()));
        params.insert("value".into(), self.value.to_json());
        if let Some(target) = &self.result_target {
            params.insert("resultTarget".into(), target.to_json());
        }
    }
}

static COMPARE_STRING_SPEC: NodeSpec = NodeSpec {
    name: "CompareStringVariable",
    kind: NodeKind::Condition,
    description: "Compares a string variable with a value and returns Success if they match, otherwise returns Failure. resultTarget is for saving the result of the comparison.",
    params: &[
        ParamSpec::required("variable", ParamType::StrVar),
        ParamSpec::required("operator", ParamType::Custom("is_equal_to|is_not_equal_to")),
        ParamSpec::required("value", ParamType::StrOrVar),
        ParamSpec::optional("resultTarget", ParamType::BoolVar),
    ],
    requires: &[],
};

pub struct CompareStringVariable {
    variable: BtValue<String>,
    op: CompareOp,
    value: BtValue<String>,
    result_target: Option<BtValue<bool>>,
}

impl CompareStringVariable {
    pub fn new() -> Self {
        Self {
            variable: BtValue::literal(String::new()),
            op: CompareOp::Eq,
            value: BtValue::literal(String::new()),
            result_target: None,
        }
    }
}

impl Default for CompareStringVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for CompareStringVariable {
    fn spec(&self) -> &'static NodeSpec {
        &COMPARE_STRING_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let result = self.op.compare(
            &self.variable.get(&ctx.blackboard),
            &self.value.get(&ctx.blackboard),
        );
        if let Some(target) = &self.result_target {
            target.set(&mut ctx.blackboard, result);
        }
        state_from(result)
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        let (key, _) = reference_param(params, &COMPARE_STRING_SPEC, "variable")?;
        self.variable = BtValue::reference(key, String::new());
        self.op = parse_equality_op(params, &COMPARE_STRING_SPEC)?;
        self.value = BtValue::from_json(params.get("value"), String::new());
        self.result_target = optional_bool_ref(params, "resultTarget");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("variable".into(), self.variable.to_json());
        params.insert("operator".into(), Json::from(self.op.as_str()));
        params.insert("value".into(), self.value.to_json());
        if let Some(target) = &self.result_target {
            params.insert("resultTarget".into(), target.to_json());
        }
    }
}

fn parse_equality_op(params: &JsonMap, spec: &'static NodeSpec) -> Result<CompareOp, TreeError> {
    let op = enum_str(params, spec, "operator")
        .map(CompareOp::parse)?
        .ok_or_else(|| invalid(spec, "operator"))?;
    if !op.is_equality() {
        return Err(invalid(spec, "operator"));
    }
    Ok(op)
}

static COMPARE_ENTITY_SPEC: NodeSpec = NodeSpec {
    name: "CompareEntityVariable",
    kind: NodeKind::Condition,
    description: "Compares an entity variable with another entity or null. value is optional. resultTarget is for saving the result of the comparison.",
    params: &[
        ParamSpec::required("variable", ParamType::EntityVar),
        ParamSpec::required(
            "operator",
            ParamType::Custom("is_equal_to|is_not_equal_to|is_null|is_not_null"),
        ),
        ParamSpec::optional("value", ParamType::EntityVar),
        ParamSpec::optional("resultTarget", ParamType::BoolVar),
    ],
    requires: &[],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityOp {
    Eq,
    Ne,
    IsNull,
    IsNotNull,
}

impl EntityOp {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "is_equal_to" => Some(EntityOp::Eq),
            "is_not_equal_to" => Some(EntityOp::Ne),
            "is_null" => Some(EntityOp::IsNull),
            "is_not_null" => Some(EntityOp::IsNotNull),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            EntityOp::Eq => "is_equal_to",
            EntityOp::Ne => "is_not_equal_to",
            EntityOp::IsNull => "is_null",
            EntityOp::IsNotNull => "is_not_null",
        }
    }
}

pub struct CompareEntityVariable {
    variable: BtValue<Option<EntityId>>,
    op: EntityOp,
    value: Option<BtValue<Option<EntityId>>>,
    result_target: Option<BtValue<bool>>,
}

impl CompareEntityVariable {
    pub fn new() -> Self {
        Self {
            variable: BtValue::literal(None),
            op: EntityOp::IsNull,
            value: None,
            result_target: None,
        }
    }
}

impl Default for CompareEntityVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafNode for CompareEntityVariable {
    fn spec(&self) -> &'static NodeSpec {
        &COMPARE_ENTITY_SPEC
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState {
        let variable = self.variable.get(&ctx.blackboard);
        let value = self.value.as_ref().and_then(|v| v.get(&ctx.blackboard));
        let result = match self.op {
            EntityOp::Eq => variable == value,
            EntityOp::Ne => variable != value,
            EntityOp::IsNull => variable.is_none(),
            EntityOp::IsNotNull => variable.is_some(),
        };
        if let Some(target) = &self.result_target {
            target.set(&mut ctx.blackboard, result);
        }
        state_from(result)
    }

    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError> {
        let (key, _) = reference_param(params, &COMPARE_ENTITY_SPEC, "variable")?;
        self.variable = BtValue::reference(key, None);
        self.op = enum_str(params, &COMPARE_ENTITY_SPEC, "operator")
            .map(EntityOp::parse)?
            .ok_or_else(|| invalid(&COMPARE_ENTITY_SPEC, "operator"))?;
        self.value = optional_entity_ref(params, "value");
        self.result_target = optional_bool_ref(params, "resultTarget");
        Ok(())
    }

    fn save(&self, params: &mut JsonMap) {
        params.insert("variable".into(), self.variable.to_json());
        params.insert("operator".into(), Json::from(self.op.as_str()));
        params.insert("value".into(), optional_entity_ref_to_json(&self.value));
        if let Some(target) = &self.result_target {
            params.insert("resultTarget".into(), target.to_json());
        }
    }
}
