//! Engine-agnostic behavior tree kernel primitives.
//!
//! This crate holds the pieces the interpreter (`arbor-bt`) and the node
//! catalog (`arbor-nodes`) share: the typed variable store, literal/reference
//! value indirection, tick context, entity handles, and the host capability
//! traits the surrounding engine implements.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod btvalue;
pub mod entity;
pub mod host;
pub mod store;
pub mod tick;
pub mod value;

pub use btvalue::{reference_key, BtValue};
pub use entity::EntityId;
pub use host::{
    Capability, ContactDirection, ContactHost, ContactPhase, Host, LifecycleHost, MovementHost,
    OutcomeHost, SpawnAnchor, Vec2,
};
pub use store::{key_type_tag, Blackboard, KeyType, VarStore};
pub use tick::TickContext;
pub use value::{Value, VarValue};
