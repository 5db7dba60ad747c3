//! View-side collaborators invoked by the scheduler tasks.
//!
//! Both are optional: a task receives `Option<Arc<dyn ..>>` at construction and skips the
//! side effect when the hook is absent.
use async_trait::async_trait;

use floor_model::{ContextId, DutyStatus, StaffId, StaffShift};

/// Refresh entry points of the dashboard views.
#[async_trait]
pub trait ViewHooks: Send + Sync {
    /// Re-render the station view for `context` after a successful mutation.
    async fn refresh(&self, context: ContextId);

    /// Drop every cached view and rebuild from scratch.
    async fn reload(&self);
}

/// Board of staff members currently shown in the view.
pub trait StaffBoard: Send + Sync {
    /// Staff entries visible right now, with their shift windows.
    fn visible_staff(&self) -> Vec<StaffShift>;

    /// Apply a freshly derived status to one entry.
    fn apply_status(&self, staff: &StaffId, status: DutyStatus);
}
