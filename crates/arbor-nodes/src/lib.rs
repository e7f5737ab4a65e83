//! Concrete leaf nodes for the `arbor` interpreter: the movement, spawning,
//! variable, collision, and outcome vocabulary a JSON-authored game tree is
//! written in.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actions;
pub mod conditions;
mod param;

pub use actions::{
    DestroySelf, DestroyTarget, IncreaseVariable, Jump, Lose, MoveInDirection, SpawnEntity,
    WaitSeconds, Win,
};
pub use conditions::{
    CheckCollision, CompareBoolVariable, CompareEntityVariable, CompareNumberVariable,
    CompareStringVariable, IsOnGround, OnDestroyed, OnHit, OnStomp,
};

use arbor_bt::NodeRegistry;

/// Registers the whole default catalog. Call once at startup, before any
/// tree is built from JSON.
pub fn register_defaults(registry: &mut NodeRegistry) {
    actions::register(registry);
    conditions::register(registry);
}
