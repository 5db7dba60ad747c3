use std::fmt;

use serde::{Deserialize, Serialize};

/// A doctor or room as reported by the assignment endpoint.
///
/// The backend sends either a display name, a bare numeric id, or a record carrying both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Party {
    Name(String),
    Id(u64),
    Record {
        #[serde(default)]
        id: Option<u64>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Name(name) => f.write_str(name),
            Party::Id(id) => write!(f, "#{id}"),
            Party::Record { name: Some(name), .. } => f.write_str(name),
            Party::Record { id: Some(id), .. } => write!(f, "#{id}"),
            Party::Record { .. } => f.write_str("<unknown>"),
        }
    }
}

/// One doctor placed into one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub doctor: Party,
    pub room: Party,
}

/// Outcome of a single auto-assignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    count: usize,
    assignments: Vec<Assignment>,
}

impl AssignmentResult {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            count: assignments.len(),
            assignments,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Assignments in the order the backend applied them.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }
}
