use std::fmt;

use serde::{Deserialize, Serialize};

/// Station (location) identifier that scopes all remote polling.
///
/// `0` is the sentinel for "no active station": tasks must not touch the network while
/// the resolved context is [`ContextId::NONE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(u64);

impl ContextId {
    /// Sentinel for "no active station".
    pub const NONE: ContextId = ContextId(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_some(&self) -> bool {
        self.0 != 0
    }

    /// Returns `None` for the sentinel, otherwise the context itself.
    pub const fn active(self) -> Option<ContextId> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl From<u64> for ContextId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Identifier of a staff member or doctor shown on the floor board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StaffId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StaffId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_the_sentinel() {
        assert!(ContextId::NONE.is_none());
        assert!(ContextId::default().is_none());
        assert_eq!(ContextId::new(0), ContextId::NONE);
        assert_eq!(ContextId::NONE.active(), None);
    }

    #[test]
    fn non_zero_is_active() {
        let ctx = ContextId::new(12);
        assert!(ctx.is_some());
        assert_eq!(ctx.active(), Some(ctx));
        assert_eq!(ctx.to_string(), "12");
        assert_eq!(ContextId::NONE.to_string(), "none");
    }
}
