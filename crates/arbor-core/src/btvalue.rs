use serde_json::Value as Json;
use tracing::warn;

use crate::store::Blackboard;
use crate::value::VarValue;

/// A node parameter resolved at use time: either a literal baked in at
/// construction, or a named reference into the variable store with a
/// fallback default.
#[derive(Debug, Clone, PartialEq)]
pub enum BtValue<T: VarValue> {
    Literal(T),
    Reference { key: String, default: T },
}

/// Extracts the key from a `"{name}"` reference token, if `token` is one.
pub fn reference_key(token: &Json) -> Option<&str> {
    let s = token.as_str()?;
    let inner = s.strip_prefix('{')?.strip_suffix('}')?;
    Some(inner)
}

impl<T: VarValue> BtValue<T> {
    pub fn literal(value: T) -> Self {
        BtValue::Literal(value)
    }

    pub fn reference(key: impl Into<String>, default: T) -> Self {
        BtValue::Reference {
            key: key.into(),
            default,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, BtValue::Reference { .. })
    }

    pub fn get(&self, bb: &Blackboard<'_>) -> T {
        match self {
            BtValue::Literal(value) => value.clone(),
            BtValue::Reference { key, default } => bb.get(key, default.clone()),
        }
    }

    /// Writes through a reference. On a literal this is a diagnosable no-op,
    /// not a hard failure.
    pub fn set(&self, bb: &mut Blackboard<'_>, value: T) {
        match self {
            BtValue::Literal(_) => {
                warn!(ty = T::TYPE_NAME, "cannot write through a literal value");
            }
            BtValue::Reference { key, .. } => bb.set(key, value),
        }
    }

    /// Builds from a JSON token. The exact string form `"{name}"` becomes a
    /// reference; any other scalar a literal; a missing/null/inconvertible
    /// token falls back to `Literal(default)` (with a diagnostic for the
    /// inconvertible case).
    pub fn from_json(token: Option<&Json>, default: T) -> Self {
        let Some(token) = token else {
            return BtValue::Literal(default);
        };
        if token.is_null() {
            return BtValue::Literal(default);
        }
        if let Some(key) = reference_key(token) {
            return BtValue::reference(key, default);
        }
        match T::from_json(token) {
            Some(value) => BtValue::Literal(value),
            None => {
                warn!(
                    %token,
                    requested = T::TYPE_NAME,
                    "parameter value does not convert, using default"
                );
                BtValue::Literal(default)
            }
        }
    }

    /// Serializes back to a JSON token: literals as plain scalars,
    /// references in the `"{name}"` form.
    pub fn to_json(&self) -> Json {
        match self {
            BtValue::Literal(value) => value.to_json(),
            BtValue::Reference { key, .. } => Json::String(format!("{{{key}}}")),
        }
    }
}
