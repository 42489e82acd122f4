//! Error telemetry pipeline.
//!
//! Events are scrubbed of secrets and PII, fingerprinted, and sent to the
//! external tracking service. A database fallback keeps deduplicated
//! copies when the service is unavailable, when an event is critical, and
//! for every production error.

pub mod classify;
pub mod event;
pub mod fingerprint;
pub mod ingest;
pub mod redact;
pub mod reporter;
pub mod sink;

pub use classify::{
    severity_for_status, should_report_unexpected_error, should_use_fallback, TimeoutTracker,
};
pub use event::{ErrorEvent, ErrorEventInput, RawEvent, Severity, Source};
pub use fingerprint::{actor_hash, fingerprint, time_bucket};
pub use ingest::{ClientIdentity, ErrorIngestService, IngestOutcome, SkipReason};
pub use redact::{redact_context, redact_text};
pub use reporter::{ErrorReporter, Report, ReportOutcome};
pub use sink::{HttpTrackingSink, SinkError, TrackingSink};

#[cfg(any(test, feature = "test-utils"))]
pub use sink::MockTrackingSink;
