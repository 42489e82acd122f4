//! Error event types: the validated ingest payload and the sanitized event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::fingerprint::fingerprint;
use super::redact::{redact_context, redact_text, truncate_chars};
use crate::config::{
    TELEMETRY_MAX_ACTION_LENGTH, TELEMETRY_MAX_ENVIRONMENT_LENGTH, TELEMETRY_MAX_MESSAGE_LENGTH,
    TELEMETRY_MAX_RELEASE_LENGTH, TELEMETRY_MAX_ROUTE_LENGTH, TELEMETRY_MAX_STACK_LENGTH,
};

/// Event severity. Ordered: warning < error < fatal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    #[default]
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

/// Where the event was captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Client,
    Server,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Client => "client",
            Source::Server => "server",
        }
    }
}

/// Payload accepted by `POST /api/log-error`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ErrorEventInput {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub source: Source,
    #[validate(length(max = 200, message = "La ruta no puede superar 200 caracteres"))]
    #[schema(example = "/productos/cemento")]
    pub route: Option<String>,
    #[validate(length(max = 120, message = "La acción no puede superar 120 caracteres"))]
    #[schema(example = "add_to_quote")]
    pub action: Option<String>,
    #[validate(length(
        min = 1,
        max = 500,
        message = "El mensaje debe tener entre 1 y 500 caracteres"
    ))]
    #[schema(example = "TypeError: cannot read properties of undefined")]
    pub message: String,
    #[validate(length(max = 8000, message = "El stack no puede superar 8000 caracteres"))]
    pub stack: Option<String>,
    #[schema(value_type = Object)]
    pub context: Option<Value>,
    /// Force persistence in the fallback store
    #[serde(default)]
    pub critical: bool,
    #[validate(length(max = 40))]
    pub environment: Option<String>,
    #[validate(length(max = 80))]
    pub release: Option<String>,
    #[serde(alias = "sessionId")]
    #[validate(length(max = 200))]
    pub session_id: Option<String>,
}

/// Sanitized event ready for the tracking sink or the fallback store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEvent {
    pub severity: Severity,
    pub source: Source,
    pub route: String,
    pub action: String,
    pub message: String,
    pub stack: Option<String>,
    pub environment: String,
    pub release: String,
    pub context: Value,
    pub actor_hash: String,
    pub fingerprint: String,
    pub critical: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Unsanitized parts of an event, before redaction and fingerprinting
#[derive(Debug, Clone, Default)]
pub struct RawEvent {
    pub severity: Severity,
    pub source: Source,
    pub route: Option<String>,
    pub action: Option<String>,
    pub message: String,
    pub stack: Option<String>,
    pub context: Option<Value>,
    pub critical: bool,
    pub environment: String,
    pub release: String,
}

impl ErrorEvent {
    /// Redact every free-text part, clip it to the stored width, then
    /// fingerprint the result.
    ///
    /// Redaction can lengthen text (an address becomes `[REDACTED_EMAIL]`),
    /// so clipping runs after it.
    pub fn sanitize(raw: RawEvent, actor_hash: String) -> Self {
        let route = raw
            .route
            .map(|r| clip(&r, TELEMETRY_MAX_ROUTE_LENGTH))
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        let action = raw
            .action
            .map(|a| clip(&a, TELEMETRY_MAX_ACTION_LENGTH))
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        let message = clip(&raw.message, TELEMETRY_MAX_MESSAGE_LENGTH);
        let stack = raw.stack.map(|s| clip(&s, TELEMETRY_MAX_STACK_LENGTH));
        let context = raw
            .context
            .as_ref()
            .map(redact_context)
            .unwrap_or(Value::Null);
        let fingerprint = fingerprint(&message, stack.as_deref(), &route, &action);

        Self {
            severity: raw.severity,
            source: raw.source,
            route,
            action,
            message,
            stack,
            environment: truncate_chars(&raw.environment, TELEMETRY_MAX_ENVIRONMENT_LENGTH),
            release: truncate_chars(&raw.release, TELEMETRY_MAX_RELEASE_LENGTH),
            context,
            actor_hash,
            fingerprint,
            critical: raw.critical,
            occurred_at: Utc::now(),
        }
    }
}

fn clip(text: &str, max: usize) -> String {
    truncate_chars(&redact_text(text), max)
}

impl ErrorEventInput {
    /// Convert into a raw event, filling environment/release defaults.
    pub fn into_raw(self, default_environment: &str, default_release: &str) -> RawEvent {
        RawEvent {
            severity: self.severity,
            source: self.source,
            route: self.route,
            action: self.action,
            message: self.message,
            stack: self.stack,
            context: self.context,
            critical: self.critical,
            environment: self
                .environment
                .unwrap_or_else(|| default_environment.to_string()),
            release: self.release.unwrap_or_else(|| default_release.to_string()),
        }
    }
}
