use serde::{Deserialize, Serialize};

/// Per-frame evaluation context.
///
/// One tick is one external invocation of a tree's evaluation. Nodes that
/// span multiple ticks (timed waits and the like) accumulate `dt_seconds`
/// themselves rather than sampling a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self { tick, dt_seconds }
    }
}
