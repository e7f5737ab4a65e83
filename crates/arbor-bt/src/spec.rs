use arbor_core::Capability;

use crate::factory::NodeRegistry;
use crate::node::NodeKind;
use crate::tree::{CompositeKind, DecoratorKind};

/// Parameter type tags, rendered into the documentation strings the
/// tree-authoring pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    BoolOrVar,
    BoolVar,
    Int,
    IntOrVar,
    IntVar,
    Float,
    FloatOrVar,
    FloatVar,
    Str,
    StrOrVar,
    StrVar,
    EntityVar,
    StringList,
    OneNode,
    NodeList,
    Custom(&'static str),
}

impl ParamType {
    pub fn type_string(self) -> &'static str {
        match self {
            ParamType::Bool => "only bool",
            ParamType::BoolOrVar => "bool_or_{b_var}",
            ParamType::BoolVar => "only {b_var}",
            ParamType::Int => "only int",
            ParamType::IntOrVar => "int_or_{i_var}",
            ParamType::IntVar => "only {i_var}",
            ParamType::Float => "only float",
            ParamType::FloatOrVar => "float_or_{f_var}",
            ParamType::FloatVar => "only {f_var}",
            ParamType::Str => "only string",
            ParamType::StrOrVar => "string_or_{s_var}",
            ParamType::StrVar => "only {s_var}",
            ParamType::EntityVar => "only {e_var}",
            ParamType::StringList => "[string list]",
            ParamType::OneNode => "only one node object",
            ParamType::NodeList => "[node list]",
            ParamType::Custom(s) => s,
        }
    }
}

/// One declared parameter of a node type.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

/// Static metadata attached to a node type: identity, documentation, declared
/// parameters, and the host capabilities the node needs on its entity.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec {
    pub name: &'static str,
    pub kind: NodeKind,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub requires: &'static [Capability],
}

const SELECTOR_SPEC: NodeSpec = NodeSpec {
    name: CompositeKind::Selector.name(),
    kind: NodeKind::Composite,
    description: "Executes child nodes in order until one succeeds. Returns Success if any child succeeds, otherwise Failure.",
    params: &[ParamSpec::required("children", ParamType::NodeList)],
    requires: &[],
};

const SEQUENCE_SPEC: NodeSpec = NodeSpec {
    name: CompositeKind::Sequence.name(),
    kind: NodeKind::Composite,
    description: "Executes child nodes in order until one fails or all succeed. Returns Success if all children succeed.",
    params: &[ParamSpec::required("children", ParamType::NodeList)],
    requires: &[],
};

const INVERT_SPEC: NodeSpec = NodeSpec {
    name: DecoratorKind::Invert.name(),
    kind: NodeKind::Decorator,
    description: "Inverts the child result: Success becomes Failure and Failure becomes Success. Running passes through.",
    params: &[ParamSpec::required("child", ParamType::OneNode)],
    requires: &[],
};

const SUCCEED_SPEC: NodeSpec = NodeSpec {
    name: DecoratorKind::Succeed.name(),
    kind: NodeKind::Decorator,
    description: "Evaluates the child and returns Success whatever it resolved to. Running passes through.",
    params: &[ParamSpec::required("child", ParamType::OneNode)],
    requires: &[],
};

const FAIL_SPEC: NodeSpec = NodeSpec {
    name: DecoratorKind::Fail.name(),
    kind: NodeKind::Decorator,
    description: "Evaluates the child and returns Failure whatever it resolved to. Running passes through.",
    params: &[ParamSpec::required("child", ParamType::OneNode)],
    requires: &[],
};

/// Specs of the built-in composite and decorator kinds, in documentation
/// order.
pub fn builtin_specs() -> &'static [NodeSpec] {
    &[
        SELECTOR_SPEC,
        SEQUENCE_SPEC,
        INVERT_SPEC,
        SUCCEED_SPEC,
        FAIL_SPEC,
    ]
}

/// Emits one machine-and-human-readable line per available node type:
///
/// ```text
/// { "type": ..., "name": ..., "<param>": "<type-string>", "required": [...] } // description
/// ```
///
/// Built-in combinators come first, then every registered leaf in name
/// order. Pure reflection over static metadata; no runtime state.
pub fn generate_node_docs(registry: &NodeRegistry) -> String {
    let mut out = String::new();
    for spec in builtin_specs().iter().chain(registry.specs()) {
        out.push_str(&doc_line(spec));
        out.push('\n');
    }
    out
}

fn doc_line(spec: &NodeSpec) -> String {
    let mut parts = vec![
        format!("\"type\": \"{}\"", spec.kind.as_str()),
        format!("\"name\": \"{}\"", spec.name),
    ];
    for param in spec.params {
        parts.push(format!("\"{}\": \"{}\"", param.name, param.ty.type_string()));
    }
    let required: Vec<String> = spec
        .params
        .iter()
        .filter(|p| p.required)
        .map(|p| format!("\"{}\"", p.name))
        .collect();
    if !required.is_empty() {
        parts.push(format!("\"required\": [{}]", required.join(", ")));
    }

    let mut line = format!("{{ {} }}", parts.join(", "));
    if !spec.description.is_empty() {
        line.push_str(" // ");
        line.push_str(spec.description);
    }
    line
}
