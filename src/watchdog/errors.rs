//! # Watchdog Errors

use thiserror::Error;

/// Result type for watchdog operations
pub type WatchdogResult<T> = Result<T, WatchdogError>;

/// Watchdog errors
#[derive(Debug, Clone, Error)]
pub enum WatchdogError {
    #[error("Invalid cron expression '{0}': {1}")]
    InvalidCron(String, String),

    #[error("No upcoming run for schedule '{0}'")]
    ScheduleExhausted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = WatchdogError::InvalidCron("bogus".into(), "bad field".into());
        assert!(err.to_string().contains("bogus"));
    }
}
