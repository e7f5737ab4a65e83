//! Loading helpers shared by the node catalog.

use serde_json::Value as Json;

use arbor_bt::{require, JsonMap, NodeSpec, TreeError};
use arbor_core::{key_type_tag, reference_key, BtValue, KeyType};

pub(crate) fn invalid(spec: &'static NodeSpec, param: &'static str) -> TreeError {
    TreeError::InvalidParam {
        node: spec.name,
        param,
    }
}

/// A required `[string list]` parameter.
pub(crate) fn string_list(
    params: &JsonMap,
    spec: &'static NodeSpec,
    name: &'static str,
) -> Result<Vec<String>, TreeError> {
    let list = require(params, spec, name)?
        .as_array()
        .ok_or_else(|| invalid(spec, name))?;
    list.iter()
        .map(|token| {
            token
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| invalid(spec, name))
        })
        .collect()
}

pub(crate) fn string_list_to_json(tags: &[String]) -> Json {
    Json::Array(tags.iter().map(|t| Json::from(t.as_str())).collect())
}

/// A required enumerated-string parameter (`"enter|exit|stay"` and friends).
pub(crate) fn enum_str<'a>(
    params: &'a JsonMap,
    spec: &'static NodeSpec,
    name: &'static str,
) -> Result<&'a str, TreeError> {
    require(params, spec, name)?
        .as_str()
        .ok_or_else(|| invalid(spec, name))
}

/// A reference-only parameter: the `{key}` form plus its type tag.
pub(crate) fn reference_param(
    params: &JsonMap,
    spec: &'static NodeSpec,
    name: &'static str,
) -> Result<(String, Option<KeyType>), TreeError> {
    let token = require(params, spec, name)?;
    let key = reference_key(token).ok_or_else(|| invalid(spec, name))?;
    let tag = key_type_tag(key);
    Ok((key.to_owned(), tag))
}

/// An int-or-float variable/value pair, typed by the variable key's tag.
/// Shared by the arithmetic and comparison nodes.
pub(crate) enum NumberPair {
    Int {
        variable: BtValue<i32>,
        value: BtValue<i32>,
    },
    Float {
        variable: BtValue<f32>,
        value: BtValue<f32>,
    },
}

impl NumberPair {
    pub(crate) fn load(
        params: &JsonMap,
        spec: &'static NodeSpec,
        var_name: &'static str,
        value_name: &'static str,
    ) -> Result<Self, TreeError> {
        let (key, tag) = reference_param(params, spec, var_name)?;
        let value_token = require(params, spec, value_name)?;
        match tag {
            Some(KeyType::Int) => Ok(NumberPair::Int {
                variable: BtValue::reference(key, 0),
                value: BtValue::from_json(Some(value_token), 0),
            }),
            Some(KeyType::Float) => Ok(NumberPair::Float {
                variable: BtValue::reference(key, 0.0),
                value: BtValue::from_json(Some(value_token), 0.0),
            }),
            _ => Err(invalid(spec, var_name)),
        }
    }

    pub(crate) fn save(&self, params: &mut JsonMap, var_name: &str, value_name: &str) {
        match self {
            NumberPair::Int { variable, value } => {
                params.insert(var_name.to_owned(), variable.to_json());
                params.insert(value_name.to_owned(), value.to_json());
            }
            NumberPair::Float { variable, value } => {
                params.insert(var_name.to_owned(), variable.to_json());
                params.insert(value_name.to_owned(), value.to_json());
            }
        }
    }
}

/// An optional entity-variable parameter (`outputTarget` and friends):
/// absent or null means "not wired".
pub(crate) fn optional_entity_ref(
    params: &JsonMap,
    name: &str,
) -> Option<BtValue<Option<arbor_core::EntityId>>> {
    params
        .get(name)
        .filter(|token| !token.is_null())
        .map(|token| BtValue::from_json(Some(token), None))
}

pub(crate) fn optional_entity_ref_to_json(
    value: &Option<BtValue<Option<arbor_core::EntityId>>>,
) -> Json {
    match value {
        Some(v) => v.to_json(),
        None => Json::Null,
    }
}

/// An optional bool-variable output parameter.
pub(crate) fn optional_bool_ref(params: &JsonMap, name: &str) -> Option<BtValue<bool>> {
    params
        .get(name)
        .filter(|token| !token.is_null())
        .map(|token| BtValue::from_json(Some(token), false))
}
