//! Classification rules: which failures are reported, at what severity,
//! and where they go.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::TELEMETRY_TIMEOUT_THRESHOLD;

use super::event::Severity;

/// Severity for an HTTP status, or None when it should not be reported.
///
/// 5xx are errors, 408 and 429 are warnings, everything else (404
/// included) is expected behaviour.
pub fn severity_for_status(status: u16) -> Option<Severity> {
    match status {
        500..=599 => Some(Severity::Error),
        408 | 429 => Some(Severity::Warning),
        _ => None,
    }
}

/// Whether an unexpected failure deserves a report.
///
/// A run of consecutive timeouts at or above the threshold is always
/// reported, whatever the status.
pub fn should_report_unexpected_error(status: Option<u16>, consecutive_timeouts: u32) -> bool {
    if consecutive_timeouts >= TELEMETRY_TIMEOUT_THRESHOLD {
        return true;
    }
    status.and_then(severity_for_status).is_some()
}

/// Whether an event must be written to the fallback store.
pub fn should_use_fallback(
    sink_available: bool,
    critical: bool,
    severity: Severity,
    production: bool,
) -> bool {
    !sink_available || critical || (production && severity >= Severity::Error)
}

/// Counts consecutive timeouts; any success resets the run.
#[derive(Debug, Default)]
pub struct TimeoutTracker {
    consecutive: AtomicU32,
}

impl TimeoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timeout and return the new run length.
    pub fn record_timeout(&self) -> u32 {
        self.consecutive.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }

    pub fn record_success(&self) {
        self.consecutive.store(0, Ordering::SeqCst);
    }

    pub fn count(&self) -> u32 {
        self.consecutive.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_status() {
        assert_eq!(severity_for_status(500), Some(Severity::Error));
        assert_eq!(severity_for_status(503), Some(Severity::Error));
        assert_eq!(severity_for_status(408), Some(Severity::Warning));
        assert_eq!(severity_for_status(429), Some(Severity::Warning));
        assert_eq!(severity_for_status(404), None);
        assert_eq!(severity_for_status(400), None);
        assert_eq!(severity_for_status(200), None);
    }

    #[test]
    fn test_should_report_unexpected_error() {
        assert!(!should_report_unexpected_error(Some(404), 0));
        assert!(should_report_unexpected_error(Some(500), 0));
        assert!(!should_report_unexpected_error(None, 2));
        assert!(should_report_unexpected_error(None, 3));
        assert!(should_report_unexpected_error(Some(404), 3));
    }

    #[test]
    fn test_should_use_fallback() {
        assert!(should_use_fallback(false, false, Severity::Warning, false));
        assert!(should_use_fallback(true, true, Severity::Warning, false));
        assert!(should_use_fallback(true, false, Severity::Error, true));
        assert!(should_use_fallback(true, false, Severity::Fatal, true));
        assert!(!should_use_fallback(true, false, Severity::Warning, true));
        assert!(!should_use_fallback(true, false, Severity::Fatal, false));
    }

    #[test]
    fn test_timeout_tracker() {
        let tracker = TimeoutTracker::new();
        assert_eq!(tracker.record_timeout(), 1);
        assert_eq!(tracker.record_timeout(), 2);
        tracker.record_success();
        assert_eq!(tracker.count(), 0);
        for _ in 0..3 {
            tracker.record_timeout();
        }
        assert!(should_report_unexpected_error(None, tracker.count()));
    }
}
