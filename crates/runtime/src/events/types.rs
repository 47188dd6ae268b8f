//! Event and topic types.

use cultivation_core::PlayerId;
use serde::{Deserialize, Serialize};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// In-world time advanced
    TimePass,
    PlayerCreated,
    PlayerUpdated,
    /// A player was soft-deleted, by request or by old age
    PlayerDeleted,
}

/// Events published on the bus. Each variant belongs to exactly one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    TimePass { years: u32 },
    PlayerCreated { id: PlayerId },
    PlayerUpdated { id: PlayerId },
    PlayerDeleted { id: PlayerId },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::TimePass { .. } => Topic::TimePass,
            Event::PlayerCreated { .. } => Topic::PlayerCreated,
            Event::PlayerUpdated { .. } => Topic::PlayerUpdated,
            Event::PlayerDeleted { .. } => Topic::PlayerDeleted,
        }
    }
}
