//! Behavior tree interpreter built on `arbor-core`.
//!
//! Trees are authored as JSON, rebuilt at runtime through an explicit name
//! registry, and evaluated once per external tick against a routed variable
//! store and a narrow host seam.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod factory;
pub mod node;
pub mod runner;
pub mod spec;
pub mod tree;

pub use factory::{build_tree, tree_to_json, NodeRegistry, TreeError};
pub use node::{require, EvalContext, JsonMap, LeafNode, NodeKind, NodeState};
pub use runner::{NodeSnapshot, StateMap, TreeRunner};
pub use spec::{builtin_specs, generate_node_docs, NodeSpec, ParamSpec, ParamType};
pub use tree::{CompositeKind, DecoratorKind, NodeBody, NodeId, Tree};
