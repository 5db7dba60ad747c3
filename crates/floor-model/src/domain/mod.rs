mod context;
pub use context::{ContextId, StaffId};

mod time_of_day;
pub use time_of_day::{LocalStamp, TimeOfDay, format_date};

mod shift;
pub use shift::{DutyStatus, ShiftWindow, StaffShift};

mod assignment;
pub use assignment::{Assignment, AssignmentResult, Party};

mod status;
pub use status::{StatusReport, StatusUpdate};
