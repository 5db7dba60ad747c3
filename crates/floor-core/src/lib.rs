pub mod context;
pub mod error;
pub mod gateway;
pub mod hooks;
pub mod lifecycle;
pub mod metrics;
pub mod scheduler;
pub mod task;
pub mod wiring;

#[cfg(test)]
mod testing;

pub use task::RunContext;

pub mod prelude {
    pub use crate::context::{ActiveContextProvider, FixedContext, ScopedContext};
    pub use crate::error::CoreError;
    pub use crate::gateway::{Operation, OperationError, RemoteGateway};
    pub use crate::hooks::{StaffBoard, ViewHooks};
    pub use crate::lifecycle::Lifecycle;
    pub use crate::metrics::{MetricsBackend, MetricsHandle, noop_metrics};
    pub use crate::scheduler::{Scheduler, TaskEntry, Trigger};
    pub use crate::task::{RunContext, RunOutcome, Task};
    pub use crate::wiring::{FloorDeps, build_scheduler};
}
