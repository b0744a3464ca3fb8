//! Cron schedule for certificate checks

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use croner::Cron;

use super::errors::{WatchdogError, WatchdogResult};

/// Parsed cron schedule, evaluated in UTC.
///
/// Accepts five-field expressions and six-field expressions with a leading
/// seconds field.
pub struct CheckSchedule {
    pattern: String,
    cron: Cron,
}

impl CheckSchedule {
    /// Parse a cron expression
    pub fn parse(pattern: &str) -> WatchdogResult<Self> {
        let cron = Cron::new(pattern)
            .with_seconds_optional()
            .parse()
            .map_err(|e| WatchdogError::InvalidCron(pattern.to_string(), e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            cron,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// First tick strictly after `after`
    pub fn next_after(&self, after: &DateTime<Utc>) -> WatchdogResult<DateTime<Utc>> {
        self.cron
            .find_next_occurrence(after, false)
            .map_err(|_| WatchdogError::ScheduleExhausted(self.pattern.clone()))
    }

    /// Time to wait from `now` until the next tick
    pub fn delay_from(&self, now: &DateTime<Utc>) -> WatchdogResult<Duration> {
        let next = self.next_after(now)?;
        Ok((next - *now).to_std().unwrap_or(Duration::ZERO))
    }
}

impl fmt::Debug for CheckSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckSchedule")
            .field("pattern", &self.pattern)
            .finish()
    }
}
