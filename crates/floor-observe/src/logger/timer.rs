use std::fmt;

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use floor_model::local_offset;

use super::LoggerTimeZone;

/// RFC3339 timestamps in the configured timezone.
///
/// The local offset is read from the shared cache on every event, so an offset refresh
/// shows up without reinstalling the subscriber.
#[derive(Debug, Clone, Copy)]
pub struct LoggerRfc3339 {
    tz: LoggerTimeZone,
}

impl LoggerRfc3339 {
    pub fn new(tz: LoggerTimeZone) -> Self {
        Self { tz }
    }

    fn offset(&self) -> UtcOffset {
        match self.tz {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => local_offset(),
        }
    }

    fn stamp(&self, at: OffsetDateTime) -> String {
        at.to_offset(self.offset())
            .format(&Rfc3339)
            .unwrap_or_else(|_| "<invalid-time>".to_string())
    }
}

impl FormatTime for LoggerRfc3339 {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{} ", self.stamp(OffsetDateTime::now_utc()))
    }
}
