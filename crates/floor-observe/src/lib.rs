mod logger;
pub use logger::*;

#[cfg(feature = "timezone-sync")]
mod tz_sync;
#[cfg(feature = "timezone-sync")]
pub use tz_sync::{TZ_SYNC_INTERVAL, TZ_SYNC_TASK, TimezoneSyncTask};
