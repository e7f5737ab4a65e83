use std::collections::BTreeSet;

use tracing::warn;

use arbor_core::Capability;

use crate::node::{EvalContext, LeafNode, NodeKind, NodeState};
use crate::runner::StateMap;

/// Index of a node within its owning [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Concrete composite combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Selector,
    Sequence,
}

impl CompositeKind {
    pub const fn name(self) -> &'static str {
        match self {
            CompositeKind::Selector => "Selector",
            CompositeKind::Sequence => "Sequence",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Selector" => Some(CompositeKind::Selector),
            "Sequence" => Some(CompositeKind::Sequence),
            _ => None,
        }
    }
}

/// Concrete decorator combinators, all pure result transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorKind {
    Invert,
    Succeed,
    Fail,
}

impl DecoratorKind {
    pub const fn name(self) -> &'static str {
        match self {
            DecoratorKind::Invert => "Invert",
            DecoratorKind::Succeed => "Succeed",
            DecoratorKind::Fail => "Fail",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Invert" => Some(DecoratorKind::Invert),
            "Succeed" => Some(DecoratorKind::Succeed),
            "Fail" => Some(DecoratorKind::Fail),
        _ => None,
        }
    }

    fn apply(self, inner: NodeState) -> NodeState {
        if inner == NodeState::Running {
            return NodeState::Running;
        }
        match self {
            DecoratorKind::Invert => match inner {
                NodeState::Success => NodeState::Failure,
                _ => NodeState::Success,
            },
            DecoratorKind::Succeed => NodeState::Success,
            DecoratorKind::Fail => NodeState::Failure,
        }
    }
}

/// Kind-specific payload of one arena slot.
pub enum NodeBody {
    Leaf(Box<dyn LeafNode>),
    Composite {
        kind: CompositeKind,
        children: Vec<NodeId>,
    },
    Decorator {
        kind: DecoratorKind,
        child: Option<NodeId>,
    },
}

struct NodeSlot {
    parent: Option<NodeId>,
    body: NodeBody,
}

// Copied-out branch data so slot borrows never overlap the recursion.
enum Branch {
    Composite(CompositeKind, Vec<NodeId>),
    Decorator(DecoratorKind, Option<NodeId>),
}

/// One tree instance: an arena of nodes plus the root index.
///
/// Parent/child relationships are indices, never owning pointers; a child
/// appears in at most one parent's list and [`attach`] re-parenting clears
/// the previous link.
///
/// [`attach`]: Tree::attach
#[derive(Default)]
pub struct Tree {
    slots: Vec<NodeSlot>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn add_leaf(&mut self, leaf: Box<dyn LeafNode>) -> NodeId {
        self.push(NodeBody::Leaf(leaf))
    }

    pub fn add_composite(&mut self, kind: CompositeKind) -> NodeId {
        self.push(NodeBody::Composite {
            kind,
            children: Vec::new(),
        })
    }

    pub fn add_decorator(&mut self, kind: DecoratorKind) -> NodeId {
        self.push(NodeBody::Decorator { kind, child: None })
    }

    fn push(&mut self, body: NodeBody) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(NodeSlot { parent: None, body });
        id
    }

    /// Links `child` under `parent`. A composite appends to its child list;
    /// a decorator replaces its single slot (unlinking any previous child).
    /// If `child` already had a parent, that link is cleared first.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(previous) = self.slots[child.index()].parent {
            self.unlink(previous, child);
        }
        let mut displaced = None;
        match &mut self.slots[parent.index()].body {
            NodeBody::Composite { children, .. } => {
                if !children.contains(&child) {
                    children.push(child);
                }
            }
            NodeBody::Decorator { child: slot, .. } => {
                displaced = slot.replace(child).filter(|old| *old != child);
            }
            NodeBody::Leaf(_) => {
                warn!("cannot attach a child to a leaf node");
                return;
            }
        }
        if let Some(old) = displaced {
            self.slots[old.index()].parent = None;
        }
        self.slots[child.index()].parent = Some(parent);
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.slots[parent.index()].body {
            NodeBody::Composite { children, .. } => children.retain(|c| *c != child),
            NodeBody::Decorator { child: slot, .. } => {
                if *slot == Some(child) {
                    *slot = None;
                }
            }
            NodeBody::Leaf(_) => {}
        }
        self.slots[child.index()].parent = None;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    pub fn body(&self, id: NodeId) -> &NodeBody {
        &self.slots[id.index()].body
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        match &self.slots[id.index()].body {
            NodeBody::Leaf(leaf) => leaf.spec().kind,
            NodeBody::Composite { .. } => NodeKind::Composite,
            NodeBody::Decorator { .. } => NodeKind::Decorator,
        }
    }

    /// Display name for inspection tooling: the registered type name for
    /// leaves, the combinator name otherwise.
    pub fn display_name(&self, id: NodeId) -> &'static str {
        match &self.slots[id.index()].body {
            NodeBody::Leaf(leaf) => leaf.spec().name,
            NodeBody::Composite { kind, .. } => kind.name(),
            NodeBody::Decorator { kind, .. } => kind.name(),
        }
    }

    /// Deduplicated union of every node's declared host-capability
    /// requirements, for the host to resolve before the first tick.
    pub fn required_capabilities(&self) -> Vec<Capability> {
        let mut set = BTreeSet::new();
        for slot in &self.slots {
            if let NodeBody::Leaf(leaf) = &slot.body {
                set.extend(leaf.spec().requires.iter().copied());
            }
        }
        set.into_iter().collect()
    }

    /// Clears transient leaf state (timers and the like); called when the
    /// tree is bound to a runner.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            if let NodeBody::Leaf(leaf) = &mut slot.body {
                leaf.reset();
            }
        }
    }

    /// Evaluates the root, recording every visited node's resulting state in
    /// `states` before its parent combines it.
    pub fn evaluate(&mut self, ctx: &mut EvalContext<'_>, states: &mut StateMap) -> NodeState {
        let Some(root) = self.root else {
            warn!("tree has no root node");
            return NodeState::Failure;
        };
        self.eval_node(root, ctx, states)
    }

    fn eval_node(
        &mut self,
        id: NodeId,
        ctx: &mut EvalContext<'_>,
        states: &mut StateMap,
    ) -> NodeState {
        let branch = match &mut self.slots[id.index()].body {
            NodeBody::Leaf(leaf) => {
                let state = leaf.evaluate(ctx);
                states.record(id, state);
                return state;
            }
            NodeBody::Composite { kind, children } => Branch::Composite(*kind, children.clone()),
            NodeBody::Decorator { kind, child } => Branch::Decorator(*kind, *child),
        };

        let state = match branch {
            Branch::Composite(kind, children) => self.eval_composite(kind, &children, ctx, states),
            Branch::Decorator(kind, child) => self.eval_decorator(kind, child, ctx, states),
        };
        states.record(id, state);
        state
    }

    fn eval_composite(
        &mut self,
        kind: CompositeKind,
        children: &[NodeId],
        ctx: &mut EvalContext<'_>,
        states: &mut StateMap,
    ) -> NodeState {
        // Zero children fail for both combinators; a childless Sequence is
        // not vacuously true.
        if children.is_empty() {
            return NodeState::Failure;
        }
        match kind {
            CompositeKind::Selector => {
                for &child in children {
                    match self.eval_node(child, ctx, states) {
                        NodeState::Failure => continue,
                        state => return state,
                    }
                }
                NodeState::Failure
            }
            CompositeKind::Sequence => {
                for &child in children {
                    match self.eval_node(child, ctx, states) {
                        NodeState::Success => continue,
                        state => return state,
                    }
                }
                NodeState::Success
            }
        }
    }

    fn eval_decorator(
        &mut self,
        kind: DecoratorKind,
        child: Option<NodeId>,
        ctx: &mut EvalContext<'_>,
        states: &mut StateMap,
    ) -> NodeState {
        let Some(child) = child else {
            warn!(decorator = kind.name(), "decorator has no child");
            return NodeState::Failure;
        };
        kind.apply(self.eval_node(child, ctx, states))
    }
}
