use serde::{Deserialize, Serialize};

/// Per-record change reported by the status recompute endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Set when the transition vacated the room the record was assigned to.
    #[serde(default)]
    pub room_cleared: bool,
}

/// Payload of a successful status recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub updated_count: u64,
    #[serde(default)]
    pub updates: Vec<StatusUpdate>,
}

impl StatusReport {
    /// Returns `true` if at least one update freed a room.
    pub fn room_cleared(&self) -> bool {
        self.updates.iter().any(|u| u.room_cleared)
    }

    /// Number of updates that freed a room.
    pub fn cleared_rooms(&self) -> usize {
        self.updates.iter().filter(|u| u.room_cleared).count()
    }
}
