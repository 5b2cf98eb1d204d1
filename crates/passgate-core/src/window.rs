//! Service-hours gate for mutating operations.
//!
//! All state-changing engine calls are rejected outside the configured
//! time-of-day window; read-only lookups bypass the engine and are exempt.
//! The comparison is against the caller's local wall clock; there is no
//! timezone handling.

use chrono::NaiveTime;

/// An inclusive `[start, end]` time-of-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl AllowedWindow {
    #[must_use]
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build from hour/minute pairs; `None` when either pair is out of range.
    #[must_use]
    pub fn from_hms(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(start_hour, start_min, 0)?;
        let end = NaiveTime::from_hms_opt(end_hour, end_min, 0)?;
        Some(Self { start, end })
    }

    /// Inclusive at both ends.
    #[must_use]
    pub fn allows(&self, now: NaiveTime) -> bool {
        self.start <= now && now <= self.end
    }

    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }
}

impl Default for AllowedWindow {
    /// Standard service hours, 08:00–22:00.
    fn default() -> Self {
        Self::from_hms(8, 0, 22, 0).expect("08:00 and 22:00 are valid times")
    }
}
