//! Wall-clock access for the scheduler tasks.
//!
//! Tasks never read the system time directly; they go through a [`Clock`] so that
//! day-local comparisons can be driven deterministically in tests.
use std::sync::{Mutex, PoisonError, RwLock};

use time::{Date, OffsetDateTime, UtcOffset};

use crate::domain::{LocalStamp, TimeOfDay};

/// Cached local UTC offset.
///
/// Detection is only reliable before any threads are spawned, so it is resolved once by
/// [`init_local_offset`] and refreshed opportunistically by [`sync_local_offset`].
static LOCAL_OFFSET: RwLock<UtcOffset> = RwLock::new(UtcOffset::UTC);

/// Detects the local offset and caches it. Falls back to UTC silently.
///
/// Call from `main()` before building the tokio runtime.
pub fn init_local_offset() {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    if let Ok(mut guard) = LOCAL_OFFSET.write() {
        *guard = offset;
    }
}

/// Re-detects the local offset, keeping the cached value when detection is unavailable.
///
/// Returns `true` if the cached offset changed (e.g. a DST transition).
pub fn sync_local_offset() -> bool {
    let Ok(detected) = UtcOffset::current_local_offset() else {
        return false;
    };
    let Ok(mut guard) = LOCAL_OFFSET.write() else {
        return false;
    };
    let changed = *guard != detected;
    *guard = detected;
    changed
}

/// Returns the cached local offset.
pub fn local_offset() -> UtcOffset {
    LOCAL_OFFSET
        .read()
        .map(|guard| *guard)
        .unwrap_or(UtcOffset::UTC)
}

/// Source of day-local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> LocalStamp;
}

/// Reads the system clock in the cached local offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LocalStamp {
        OffsetDateTime::now_utc().to_offset(local_offset()).into()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<LocalStamp>,
}

impl ManualClock {
    pub fn new(date: Date, time: TimeOfDay) -> Self {
        Self {
            now: Mutex::new(LocalStamp::new(date, time)),
        }
    }

    /// Jump to an arbitrary date and time, forwards or backwards.
    pub fn set(&self, date: Date, time: TimeOfDay) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = LocalStamp::new(date, time);
    }

    /// Change the time of day, keeping the date.
    pub fn set_time(&self, time: TimeOfDay) {
        self.now.lock().unwrap_or_else(PoisonError::into_inner).time = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> LocalStamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
