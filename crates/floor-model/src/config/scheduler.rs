use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    domain::TimeOfDay,
    error::{ValidationError, ValidationResult},
};

/// Longest allowed reset check cadence: the reset boundary has minute granularity.
pub const MAX_RESET_CHECK_MS: u64 = 60_000;

/// Timer cadences and delays used by the floor scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Auto-assignment poll interval.
    pub assign_poll_ms: u64,
    /// Remote status recompute interval.
    pub status_poll_ms: u64,
    /// Local board status refresh interval.
    pub display_refresh_ms: u64,
    /// Daily reset boundary check interval.
    pub reset_check_ms: u64,
    /// Time of day at which transient daily data is reset.
    pub reset_at: TimeOfDay,
    /// Pause before acting on a mutation's result.
    pub settle_delay_ms: u64,
    /// Pause between a successful daily reset and the full view reload.
    pub reload_delay_ms: u64,
    /// Delay between load and the first timer registration.
    pub warm_up_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            assign_poll_ms: 30_000,
            status_poll_ms: 10_000,
            display_refresh_ms: 10_000,
            reset_check_ms: 60_000,
            reset_at: TimeOfDay::MIDNIGHT,
            settle_delay_ms: 500,
            reload_delay_ms: 1_000,
            warm_up_ms: 1_000,
        }
    }
}

impl SchedulerConfig {
    /// Check cadences before any timer is registered.
    ///
    /// Rules:
    /// - every poll interval is non-zero;
    /// - the reset check runs at least once per minute, otherwise the boundary minute can be missed;
    /// - `reset_at` has zero seconds, since the boundary is matched per minute.
    pub fn validate(&self) -> ValidationResult<()> {
        let intervals = [
            ("assign_poll_ms", self.assign_poll_ms),
            ("status_poll_ms", self.status_poll_ms),
            ("display_refresh_ms", self.display_refresh_ms),
            ("reset_check_ms", self.reset_check_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ValidationError::ZeroInterval { name });
            }
        }
        if self.reset_check_ms > MAX_RESET_CHECK_MS {
            return Err(ValidationError::IntervalTooLong {
                name: "reset_check_ms",
                value_ms: self.reset_check_ms,
                max_ms: MAX_RESET_CHECK_MS,
            });
        }
        if self.reset_at.second() != 0 {
            return Err(ValidationError::UnalignedBoundary(self.reset_at.to_string()));
        }
        Ok(())
    }

    pub fn assign_interval(&self) -> Duration {
        Duration::from_millis(self.assign_poll_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_poll_ms)
    }

    pub fn display_interval(&self) -> Duration {
        Duration::from_millis(self.display_refresh_ms)
    }

    pub fn reset_check_interval(&self) -> Duration {
        Duration::from_millis(self.reset_check_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }

    pub fn warm_up(&self) -> Duration {
        Duration::from_millis(self.warm_up_ms)
    }
}
