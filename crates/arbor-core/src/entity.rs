use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle for a game entity.
///
/// The interpreter never dereferences entities itself; it only routes handles
/// between the variable store and the host capability interfaces. The host
/// decides what a handle points at and when it dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn stable_id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}
