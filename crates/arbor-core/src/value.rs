use serde_json::Value as Json;

use crate::entity::EntityId;

/// A value held by the variable store.
///
/// The set of storable types is closed and matches the key type tags
/// (`i_`, `f_`, `b_`, `s_`, `e_`). Entity references are handles into the
/// host and are never literal-encodable in JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    Str(String),
    Entity(Option<EntityId>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Entity(_) => "entity",
        }
    }
}

/// Conversion between Rust types and [`Value`] / JSON tokens.
///
/// A read with a mismatched stored type yields `None` from [`from_value`];
/// the store turns that into the caller's default plus a diagnostic, never a
/// panic.
///
/// [`from_value`]: VarValue::from_value
pub trait VarValue: Sized + Clone {
    const TYPE_NAME: &'static str;

    fn into_value(self) -> Value;
    fn from_value(value: &Value) -> Option<Self>;
    fn from_json(token: &Json) -> Option<Self>;
    fn to_json(&self) -> Json;
}

impl VarValue for i32 {
    const TYPE_NAME: &'static str = "int";

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn from_json(token: &Json) -> Option<Self> {
        token.as_i64().and_then(|v| i32::try_from(v).ok())
    }

    fn to_json(&self) -> Json {
        Json::from(*self)
    }
}

impl VarValue for f32 {
    const TYPE_NAME: &'static str = "float";

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn from_json(token: &Json) -> Option<Self> {
        token.as_f64().map(|v| v as f32)
    }

    fn to_json(&self) -> Json {
        Json::from(f64::from(*self))
    }
}

impl VarValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    fn from_json(token: &Json) -> Option<Self> {
        token.as_bool()
    }

    fn to_json(&self) -> Json {
        Json::from(*self)
    }
}

impl VarValue for String {
    const TYPE_NAME: &'static str = "string";

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn from_json(token: &Json) -> Option<Self> {
        token.as_str().map(str::to_owned)
    }

    fn to_json(&self) -> Json {
        Json::from(self.clone())
    }
}

/// Entity references live in the store as `Option<EntityId>`; an `e_` key is
/// born unresolved (`None`) and only host queries can fill it in.
impl VarValue for Option<EntityId> {
    const TYPE_NAME: &'static str = "entity";

    fn into_value(self) -> Value {
        Value::Entity(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Entity(v) => Some(*v),
            _ => None,
        }
    }

    fn from_json(token: &Json) -> Option<Self> {
        // Entities are never literal-encodable; only an explicit null maps to
        // an unresolved reference.
        token.is_null().then_some(None)
    }

    fn to_json(&self) -> Json {
        Json::Null
    }
}
