//! Headless stand-ins for the dashboard view: they log what a rendered view would redraw.
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use tracing::{debug, info};

use floor_core::hooks::{StaffBoard, ViewHooks};
use floor_model::{ContextId, DutyStatus, StaffId, StaffShift};

#[derive(Debug, Default)]
pub struct LoggingHooks;

#[async_trait]
impl ViewHooks for LoggingHooks {
    async fn refresh(&self, context: ContextId) {
        info!(%context, "station view refresh");
    }

    async fn reload(&self) {
        info!("full view reload");
    }
}

/// Configured roster with the last status applied to each entry.
#[derive(Debug)]
pub struct RosterBoard {
    staff: Vec<StaffShift>,
    statuses: Mutex<HashMap<StaffId, DutyStatus>>,
}

impl RosterBoard {
    pub fn new(staff: Vec<StaffShift>) -> Self {
        Self {
            staff,
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn status(&self, staff: &StaffId) -> Option<DutyStatus> {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(staff)
            .copied()
    }

    fn display_name<'a>(&'a self, staff: &'a StaffId) -> &'a str {
        self.staff
            .iter()
            .find(|s| &s.id == staff)
            .map_or(staff.as_str(), |s| s.name.as_str())
    }
}

impl StaffBoard for RosterBoard {
    fn visible_staff(&self) -> Vec<StaffShift> {
        self.staff.clone()
    }

    fn apply_status(&self, staff: &StaffId, status: DutyStatus) {
        let previous = self
            .statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(staff.clone(), status);

        match previous {
            Some(prev) if prev == status => {
                debug!(staff = staff.as_str(), status = status.as_str(), "status unchanged")
            }
            _ => info!(
                staff = staff.as_str(),
                name = self.display_name(staff),
                from = previous.map_or("unknown", |p| p.label()),
                to = status.label(),
                badge = status.badge_class(),
                "duty status changed"
            ),
        }
    }
}
