use serde::Serialize;

use arbor_core::{Blackboard, Capability, EntityId, Host, TickContext, VarStore};

use crate::node::{EvalContext, NodeKind, NodeState};
use crate::tree::{NodeBody, NodeId, Tree};

/// Last-observed state per node, `None` before first evaluation.
///
/// Inspection-only: removing this map must not change evaluation outcomes.
#[derive(Debug, Default)]
pub struct StateMap {
    states: Vec<Option<NodeState>>,
}

impl StateMap {
    fn for_tree(tree: &Tree) -> Self {
        Self {
            states: vec![None; tree.len()],
        }
    }

    pub(crate) fn record(&mut self, id: NodeId, state: NodeState) {
        if let Some(slot) = self.states.get_mut(id.index()) {
            *slot = Some(state);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeState> {
        self.states.get(id.index()).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<NodeState>> + '_ {
        self.states.iter().copied()
    }
}

/// One row of a runner's inspection snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub name: &'static str,
    pub kind: NodeKind,
    pub depth: usize,
    pub state: Option<NodeState>,
}

/// Owns one tree instance for one entity and drives one evaluation per
/// external tick.
///
/// The runner also owns the tree's instance variable store; the scene-global
/// store and the host are passed in per tick so nothing here is ambient
/// state.
pub struct TreeRunner {
    entity: EntityId,
    tree: Tree,
    vars: VarStore,
    states: StateMap,
}

impl TreeRunner {
    pub fn new(entity: EntityId, mut tree: Tree) -> Self {
        tree.reset();
        let states = StateMap::for_tree(&tree);
        Self {
            entity,
            tree,
            vars: VarStore::new(),
            states,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The instance variable store (lifetime = this runner).
    pub fn vars(&self) -> &VarStore {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut VarStore {
        &mut self.vars
    }

    /// Bulk-loads authored variables, routing `g_`-prefixed keys into
    /// `global`.
    pub fn load_vars_from_json(
        &mut self,
        global: &mut VarStore,
        vars: &serde_json::Map<String, serde_json::Value>,
    ) {
        Blackboard::new(&mut self.vars, global).load_from_json(vars);
    }

    /// Replaces the root tree, rebinding it to this runner: transient leaf
    /// state is reset and the state map starts over at "not yet evaluated".
    pub fn set_root(&mut self, mut tree: Tree) {
        tree.reset();
        self.states = StateMap::for_tree(&tree);
        self.tree = tree;
    }

    /// Deduplicated host-capability requirements of the current tree.
    pub fn required_capabilities(&self) -> Vec<Capability> {
        self.tree.required_capabilities()
    }

    /// Evaluates the root once and records the resulting state of every
    /// visited node.
    pub fn execute(
        &mut self,
        ctx: &TickContext,
        global: &mut VarStore,
        host: &mut dyn Host,
    ) -> NodeState {
        let Self {
            entity,
            tree,
            vars,
            states,
        } = self;
        let mut eval = EvalContext {
            tick: ctx,
            entity: *entity,
            blackboard: Blackboard::new(vars, global),
            host,
        };
        tree.evaluate(&mut eval, states)
    }

    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.states.get(id)
    }

    pub fn states(&self) -> &StateMap {
        &self.states
    }

    /// Preorder snapshot of the tree with each node's last-observed state,
    /// for viewer-style tooling.
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        let mut rows = Vec::with_capacity(self.tree.len());
        if let Some(root) = self.tree.root() {
            self.snapshot_node(root, 0, &mut rows);
        }
        rows
    }

    fn snapshot_node(&self, id: NodeId, depth: usize, rows: &mut Vec<NodeSnapshot>) {
        rows.push(NodeSnapshot {
            name: self.tree.display_name(id),
            kind: self.tree.kind(id),
            depth,
            state: self.states.get(id),
        });
        match self.tree.body(id) {
            NodeBody::Leaf(_) => {}
            NodeBody::Composite { children, .. } => {
                for &child in children {
                    self.snapshot_node(child, depth + 1, rows);
                }
            }
            NodeBody::Decorator { child, .. } => {
                if let Some(child) = child {
                    self.snapshot_node(*child, depth + 1, rows);
                }
            }
        }
    }
}
