use serde::{Deserialize, Serialize};

use arbor_core::{Blackboard, EntityId, Host, TickContext};

use crate::factory::TreeError;
use crate::spec::NodeSpec;

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Tri-state result of one node evaluation.
///
/// `Running` means "not yet resolved; re-evaluate me next tick". The
/// pre-evaluation sentinel lives in the runner's state map as
/// `Option<NodeState>::None`, not here: `evaluate` can only produce these
/// three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Running,
    Success,
    Failure,
}

/// Discriminant of the node hierarchy, as spelled in authored JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Action,
    Condition,
    Composite,
    Decorator,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Action => "action",
            NodeKind::Condition => "condition",
            NodeKind::Composite => "composite",
            NodeKind::Decorator => "decorator",
        }
    }
}

/// Everything a leaf sees during one evaluation: the tick, the owning
/// entity, the routed variable store, and the host seam.
pub struct EvalContext<'a> {
    pub tick: &'a TickContext,
    pub entity: EntityId,
    pub blackboard: Blackboard<'a>,
    pub host: &'a mut dyn Host,
}

/// A concrete action or condition.
///
/// Lifecycle: constructed empty by the registry, populated by `load`, then
/// evaluated zero or more times per tick by the runner. `reset` clears any
/// transient per-node state (elapsed timers and the like) when the tree is
/// rebound.
///
/// Conditions must not mutate the game world (variable-store output
/// parameters are fine) and never return `Running`. Actions must be
/// idempotent-safe to call every tick while `Running`.
pub trait LeafNode {
    fn spec(&self) -> &'static NodeSpec;

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> NodeState;

    /// Populates typed fields from the node's JSON parameter object.
    fn load(&mut self, params: &JsonMap) -> Result<(), TreeError>;

    /// Writes the node's parameters back into `params` (`type`/`name` are
    /// the factory's job).
    fn save(&self, params: &mut JsonMap);

    fn reset(&mut self) {}
}

/// Required-parameter lookup for `load` implementations.
pub fn require<'a>(
    params: &'a JsonMap,
    spec: &'static NodeSpec,
    name: &'static str,
) -> Result<&'a serde_json::Value, TreeError> {
    params.get(name).ok_or(TreeError::MissingParam {
        node: spec.name,
        param: name,
    })
}
