mod domain;
pub use domain::{
    Assignment, AssignmentResult, ContextId, DutyStatus, LocalStamp, Party, ShiftWindow,
    StaffId, StaffShift, StatusReport, StatusUpdate, TimeOfDay, format_date,
};

mod error;
pub use error::{ValidationError, ValidationResult};

mod config;
pub use config::{GatewayConfig, SchedulerConfig};

pub mod clock;
pub use clock::{Clock, ManualClock, SystemClock, init_local_offset, local_offset};
