use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{StaffId, TimeOfDay};

/// Duty state of a staff member derived from the current time and their shift window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    WaitingToStart,
    Working,
    OnBreak,
    OffDuty,
}

impl DutyStatus {
    /// Stable machine-readable name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DutyStatus::WaitingToStart => "waiting_to_start",
            DutyStatus::Working => "working",
            DutyStatus::OnBreak => "on_break",
            DutyStatus::OffDuty => "off_duty",
        }
    }

    /// Human-readable label shown on the board.
    pub const fn label(&self) -> &'static str {
        match self {
            DutyStatus::WaitingToStart => "Waiting",
            DutyStatus::Working => "Working",
            DutyStatus::OnBreak => "On break",
            DutyStatus::OffDuty => "Off duty",
        }
    }

    /// Badge style class used by the board renderer.
    pub const fn badge_class(&self) -> &'static str {
        match self {
            DutyStatus::WaitingToStart => "badge-secondary",
            DutyStatus::Working => "badge-success",
            DutyStatus::OnBreak => "badge-warning",
            DutyStatus::OffDuty => "badge-dark",
        }
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working hours of one staff member for the current day.
///
/// The break is only honoured when both of its bounds are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub work_start: TimeOfDay,
    pub work_end: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<TimeOfDay>,
}

impl ShiftWindow {
    pub fn new(work_start: TimeOfDay, work_end: TimeOfDay) -> Self {
        Self {
            work_start,
            work_end,
            break_start: None,
            break_end: None,
        }
    }

    pub fn with_break(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    /// Derive the duty status at `now`.
    ///
    /// Precedence, first match wins:
    /// 1. `now >= work_end` → [`DutyStatus::OffDuty`]
    /// 2. `break_start <= now < break_end` → [`DutyStatus::OnBreak`]
    /// 3. `work_start <= now < work_end` → [`DutyStatus::Working`]
    /// 4. otherwise → [`DutyStatus::WaitingToStart`]
    pub fn status_at(&self, now: TimeOfDay) -> DutyStatus {
        if now >= self.work_end {
            return DutyStatus::OffDuty;
        }
        if let (Some(start), Some(end)) = (self.break_start, self.break_end) {
            if start <= now && now < end {
                return DutyStatus::OnBreak;
            }
        }
        if self.work_start <= now && now < self.work_end {
            return DutyStatus::Working;
        }
        DutyStatus::WaitingToStart
    }
}

/// A staff member currently visible on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffShift {
    pub id: StaffId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub shift: ShiftWindow,
}

impl StaffShift {
    pub fn new(id: impl Into<StaffId>, name: impl Into<String>, shift: ShiftWindow) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shift,
        }
    }

    #[inline]
    pub fn status_at(&self, now: TimeOfDay) -> DutyStatus {
        self.shift.status_at(now)
    }
}
