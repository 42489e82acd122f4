//! Server-side error capture: tracking service first, fallback store when
//! the service is unavailable or the event must be kept.

use serde_json::Value;
use std::sync::Arc;

use super::classify::{should_report_unexpected_error, should_use_fallback, TimeoutTracker};
use super::event::{ErrorEvent, RawEvent, Severity, Source};
use super::fingerprint::actor_hash;
use super::ingest::{ErrorIngestService, IngestOutcome};
use super::sink::{SinkError, TrackingSink};
use crate::config::Config;

/// A server-side failure to report
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub severity: Severity,
    pub route: Option<String>,
    pub action: Option<String>,
    pub message: String,
    pub stack: Option<String>,
    pub context: Option<Value>,
    pub critical: bool,
}

/// What happened to a captured report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub delivered: bool,
    pub fallback: Option<IngestOutcome>,
}

pub struct ErrorReporter {
    sink: Arc<dyn TrackingSink>,
    ingest: Arc<ErrorIngestService>,
    sink_timeouts: TimeoutTracker,
    environment: String,
    release: String,
    production: bool,
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn TrackingSink>, ingest: Arc<ErrorIngestService>, config: &Config) -> Self {
        Self {
            sink,
            ingest,
            sink_timeouts: TimeoutTracker::new(),
            environment: config.environment.clone(),
            release: config.release.clone(),
            production: config.is_production(),
        }
    }

    /// Capture a report. Never fails; delivery problems are logged.
    pub async fn capture(&self, report: Report) -> ReportOutcome {
        let raw = RawEvent {
            severity: report.severity,
            source: Source::Server,
            route: report.route,
            action: report.action,
            message: report.message,
            stack: report.stack,
            context: report.context,
            critical: report.critical,
            environment: self.environment.clone(),
            release: self.release.clone(),
        };
        let mut event = ErrorEvent::sanitize(raw, actor_hash("server", None));

        match event.severity {
            Severity::Warning => tracing::warn!(
                route = %event.route,
                fingerprint = %event.fingerprint,
                "{}", event.message
            ),
            Severity::Error | Severity::Fatal => tracing::error!(
                route = %event.route,
                fingerprint = %event.fingerprint,
                severity = event.severity.as_str(),
                "{}", event.message
            ),
        }

        let delivered = self.deliver(&mut event).await;
        let fallback = if should_use_fallback(
            delivered,
            event.critical,
            event.severity,
            self.production,
        ) {
            match self.ingest.store_event(event).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    tracing::error!(error = %e, "Fallback error store write failed");
                    None
                }
            }
        } else {
            None
        };

        ReportOutcome {
            delivered,
            fallback,
        }
    }

    /// Send to the sink. A run of timeouts escalates the event to critical.
    async fn deliver(&self, event: &mut ErrorEvent) -> bool {
        if !self.sink.is_configured() {
            return false;
        }
        match self.sink.send(event).await {
            Ok(()) => {
                self.sink_timeouts.record_success();
                true
            }
            Err(SinkError::Timeout) => {
                let run = self.sink_timeouts.record_timeout();
                if should_report_unexpected_error(None, run) {
                    tracing::warn!(consecutive = run, "Tracking service keeps timing out");
                    event.critical = true;
                }
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Tracking service rejected event");
                false
            }
        }
    }
}
