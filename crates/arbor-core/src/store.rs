use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};
use tracing::warn;

use crate::value::{Value, VarValue};

/// Scope/type information carried by a key's prefix.
///
/// `g_` selects the scene-global store and is checked before the type tag;
/// the remaining two-character prefix pins the stored type. A key written
/// with one type must always be read with that type; a mismatched read falls
/// back to the caller's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Int,
    Float,
    Bool,
    Str,
    Entity,
}

/// Type tag of `key` after stripping an optional `g_` scope prefix, or
/// `None` for an untagged key.
pub fn key_type_tag(key: &str) -> Option<KeyType> {
    let tag = key.strip_prefix("g_").unwrap_or(key);
    if tag.starts_with("i_") {
        Some(KeyType::Int)
    } else if tag.starts_with("f_") {
        Some(KeyType::Float)
    } else if tag.starts_with("b_") {
        Some(KeyType::Bool)
    } else if tag.starts_with("s_") {
        Some(KeyType::Str)
    } else if tag.starts_with("e_") {
        Some(KeyType::Entity)
    } else {
        None
    }
}

fn is_global(key: &str) -> bool {
    key.starts_with("g_")
}

/// One flat string-keyed mapping of typed values.
///
/// Two stores exist per running tree: the instance store owned by the tree
/// runner and the scene-global store owned by whoever owns the scene. Nodes
/// never touch a `VarStore` directly; they go through the routed
/// [`Blackboard`] view.
#[derive(Debug, Default)]
pub struct VarStore {
    data: BTreeMap<String, Value>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn set<T: VarValue>(&mut self, key: &str, value: T) {
        self.data.insert(key.to_owned(), value.into_value());
    }

    pub fn get<T: VarValue>(&self, key: &str, default: T) -> T {
        let Some(value) = self.data.get(key) else {
            return default;
        };
        match T::from_value(value) {
            Some(typed) => typed,
            None => {
                warn!(
                    key,
                    stored = value.type_name(),
                    requested = T::TYPE_NAME,
                    "variable read with mismatched type, returning default"
                );
                default
            }
        }
    }

    /// Raw view for inspection tooling; carries no behavioral weight.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Routed view over one instance store and the scene-global store.
///
/// Every operation routes on the key prefix, so node code reads exactly like
/// the authored JSON: `bb.get("g_s_level", ...)` hits the global store,
/// `bb.get("i_health", ...)` the instance store.
pub struct Blackboard<'a> {
    instance: &'a mut VarStore,
    global: &'a mut VarStore,
}

impl<'a> Blackboard<'a> {
    pub fn new(instance: &'a mut VarStore, global: &'a mut VarStore) -> Self {
        Self { instance, global }
    }

    pub fn has(&self, key: &str) -> bool {
        if is_global(key) {
            self.global.has(key)
        } else {
            self.instance.has(key)
        }
    }

    pub fn get<T: VarValue>(&self, key: &str, default: T) -> T {
        if is_global(key) {
            self.global.get(key, default)
        } else {
            self.instance.get(key, default)
        }
    }

    pub fn set<T: VarValue>(&mut self, key: &str, value: T) {
        if is_global(key) {
            self.global.set(key, value);
        } else {
            self.instance.set(key, value);
        }
    }

    /// Bulk-populates from a flat JSON object whose keys carry type
    /// prefixes. Values convert per their tag; `e_` keys always initialize
    /// to an unresolved entity reference. Untagged keys are skipped with a
    /// diagnostic.
    pub fn load_from_json(&mut self, vars: &Map<String, Json>) {
        for (key, token) in vars {
            self.set_from_token(key, token);
        }
    }

    /// Global-store equivalent of [`load_from_json`]. The global scope is
    /// reset wholesale on each load, never merged.
    ///
    /// [`load_from_json`]: Blackboard::load_from_json
    pub fn load_global_from_json(&mut self, vars: &Map<String, Json>) {
        self.global.clear();
        for (key, token) in vars {
            if !is_global(key) {
                warn!(key, "global variable without g_ prefix, skipping");
                continue;
            }
            self.set_from_token(key, token);
        }
    }

    fn set_from_token(&mut self, key: &str, token: &Json) {
        let Some(tag) = key_type_tag(key) else {
            warn!(key, "variable key has no type prefix, skipping");
            return;
        };
        match tag {
            KeyType::Int => self.set_converted::<i32>(key, token, 0),
            KeyType::Float => self.set_converted::<f32>(key, token, 0.0),
            KeyType::Bool => self.set_converted::<bool>(key, token, false),
            KeyType::Str => self.set_converted::<String>(key, token, String::new()),
            // Entities are never literal-encodable.
            KeyType::Entity => self.set(key, None::<crate::EntityId>),
        }
    }

    fn set_converted<T: VarValue>(&mut self, key: &str, token: &Json, default: T) {
        let value = T::from_json(token).unwrap_or_else(|| {
            warn!(
                key,
                %token,
                requested = T::TYPE_NAME,
                "variable value does not convert to its key type, using default"
            );
            default
        });
        self.set(key, value);
    }
}
