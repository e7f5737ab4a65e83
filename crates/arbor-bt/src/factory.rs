use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};
use thiserror::Error;
use tracing::warn;

use crate::node::{JsonMap, LeafNode, NodeKind};
use crate::spec::NodeSpec;
use crate::tree::{CompositeKind, DecoratorKind, NodeBody, NodeId, Tree};

/// Authoring errors. Any of these means "tree unusable"; the caller surfaces
/// them to whoever authored the JSON (typically an upstream generator), and
/// nothing here may crash the host.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("node is not a JSON object")]
    NotAnObject,
    #[error("node object has no \"name\" field")]
    MissingName,
    #[error("unknown node type `{0}`")]
    UnknownNode(String),
    #[error("composite node `{0}` has no \"children\" array")]
    MissingChildren(String),
    #[error("decorator node `{0}` has no \"child\" object")]
    MissingChild(String),
    #[error("node `{node}`: missing required parameter `{param}`")]
    MissingParam {
        node: &'static str,
        param: &'static str,
    },
    #[error("node `{node}`: parameter `{param}` is malformed")]
    InvalidParam {
        node: &'static str,
        param: &'static str,
    },
}

type LeafCtor = fn() -> Box<dyn LeafNode>;

/// Explicit name-to-constructor registry for leaf node types.
///
/// Populated once at startup by a registration step; the factory resolves
/// every `"name"` it finds in authored JSON against this map. Composite and
/// decorator combinators are built in and resolved by kind name.
#[derive(Default)]
pub struct NodeRegistry {
    leaves: BTreeMap<&'static str, (&'static NodeSpec, LeafCtor)>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: &'static NodeSpec, ctor: LeafCtor) {
        if self.leaves.insert(spec.name, (spec, ctor)).is_some() {
            warn!(name = spec.name, "node type registered twice, replacing");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.leaves.contains_key(name)
    }

    pub fn make(&self, name: &str) -> Option<Box<dyn LeafNode>> {
        self.leaves.get(name).map(|(_, ctor)| ctor())
    }

    pub fn spec(&self, name: &str) -> Option<&'static NodeSpec> {
        self.leaves.get(name).map(|(spec, _)| *spec)
    }

    /// Registered leaf specs in name order.
    pub fn specs(&self) -> impl Iterator<Item = &'static NodeSpec> + '_ {
        self.leaves.values().map(|(spec, _)| *spec)
    }
}

/// Rebuilds a whole tree from its authored JSON, recursing into composite
/// `children` arrays and decorator `child` objects.
pub fn build_tree(registry: &NodeRegistry, json: &Json) -> Result<Tree, TreeError> {
    let mut tree = Tree::new();
    let root = build_node(registry, &mut tree, json)?;
    tree.set_root(root);
    Ok(tree)
}

fn build_node(registry: &NodeRegistry, tree: &mut Tree, json: &Json) -> Result<NodeId, TreeError> {
    let obj = json.as_object().ok_or(TreeError::NotAnObject)?;
    let name = node_name(obj)?;

    match obj.get("type").and_then(Json::as_str) {
        Some("composite") => {
            let kind = CompositeKind::from_name(name)
                .ok_or_else(|| TreeError::UnknownNode(name.to_owned()))?;
            let children = obj
                .get("children")
                .and_then(Json::as_array)
                .ok_or_else(|| TreeError::MissingChildren(name.to_owned()))?;
            let id = tree.add_composite(kind);
            for child_json in children {
                let child = build_node(registry, tree, child_json)?;
                tree.attach(id, child);
            }
            Ok(id)
        }
        Some("decorator") => {
            let kind = DecoratorKind::from_name(name)
                .ok_or_else(|| TreeError::UnknownNode(name.to_owned()))?;
            let child_json = obj
                .get("child")
                .filter(|c| !c.is_null())
                .ok_or_else(|| TreeError::MissingChild(name.to_owned()))?;
            let id = tree.add_decorator(kind);
            let child = build_node(registry, tree, child_json)?;
            tree.attach(id, child);
            Ok(id)
        }
        declared => {
            let mut leaf = registry
                .make(name)
                .ok_or_else(|| TreeError::UnknownNode(name.to_owned()))?;
            let spec = leaf.spec();
            if let Some(declared) = declared {
                if declared != spec.kind.as_str() {
                    warn!(
                        name,
                        declared,
                        actual = spec.kind.as_str(),
                        "node \"type\" disagrees with its registered kind"
                    );
                }
            }
            check_required(spec, obj)?;
            leaf.load(obj)?;
            Ok(tree.add_leaf(leaf))
        }
    }
}

fn node_name(obj: &JsonMap) -> Result<&str, TreeError> {
    obj.get("name")
        .and_then(Json::as_str)
        .filter(|name| !name.is_empty())
        .ok_or(TreeError::MissingName)
}

fn check_required(spec: &'static NodeSpec, obj: &JsonMap) -> Result<(), TreeError> {
    for param in spec.params.iter().filter(|p| p.required) {
        if !obj.contains_key(param.name) {
            return Err(TreeError::MissingParam {
                node: spec.name,
                param: param.name,
            });
        }
    }
    Ok(())
}

/// Serializes a tree back to the authored JSON form. Lossless for
/// engine-relevant fields: rebuilding the output evaluates identically
/// tick-for-tick given the same store contents.
pub fn tree_to_json(tree: &Tree) -> Json {
    match tree.root() {
        Some(root) => node_to_json(tree, root),
        None => Json::Null,
    }
}

fn node_to_json(tree: &Tree, id: NodeId) -> Json {
    let mut obj = Map::new();
    match tree.body(id) {
        NodeBody::Leaf(leaf) => {
            let spec = leaf.spec();
            obj.insert("type".into(), Json::from(spec.kind.as_str()));
            obj.insert("name".into(), Json::from(spec.name));
            leaf.save(&mut obj);
        }
        NodeBody::Composite { kind, children } => {
            obj.insert("type".into(), Json::from(NodeKind::Composite.as_str()));
            obj.insert("name".into(), Json::from(kind.name()));
            let children: Vec<Json> = children.iter().map(|c| node_to_json(tree, *c)).collect();
            obj.insert("children".into(), Json::Array(children));
        }
        NodeBody::Decorator { kind, child } => {
            obj.insert("type".into(), Json::from(NodeKind::Decorator.as_str()));
            obj.insert("name".into(), Json::from(kind.name()));
            let child = match child {
                Some(child) => node_to_json(tree, *child),
                None => Json::Null,
            };
            obj.insert("child".into(), child);
        }
    }
    Json::Object(obj)
}
