//! External error-tracking service client.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::event::ErrorEvent;
use crate::config::{Config, TRACKING_SINK_TIMEOUT_SECONDS};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("tracking service not configured")]
    NotConfigured,

    #[error("tracking service timed out")]
    Timeout,

    #[error("tracking service unavailable: {0}")]
    Unavailable(String),
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TrackingSink: Send + Sync {
    /// Whether an endpoint is configured at all
    fn is_configured(&self) -> bool;
    async fn send(&self, event: &ErrorEvent) -> Result<(), SinkError>;
}

/// Body posted to the tracking service
#[derive(Debug, Serialize)]
struct TrackingPayload<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stacktrace: Option<&'a str>,
    fingerprint: [&'a str; 1],
    tags: BTreeMap<&'static str, &'a str>,
    extra: &'a Value,
    timestamp: i64,
}

impl<'a> From<&'a ErrorEvent> for TrackingPayload<'a> {
    fn from(event: &'a ErrorEvent) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("source", event.source.as_str());
        tags.insert("route", event.route.as_str());
        tags.insert("action", event.action.as_str());
        tags.insert("environment", event.environment.as_str());
        tags.insert("release", event.release.as_str());
        Self {
            level: event.severity.as_str(),
            message: &event.message,
            stacktrace: event.stack.as_deref(),
            fingerprint: [event.fingerprint.as_str()],
            tags,
            extra: &event.context,
            timestamp: event.occurred_at.timestamp(),
        }
    }
}

/// HTTP sink posting JSON events with a bearer token.
pub struct HttpTrackingSink {
    client: reqwest::Client,
    endpoint: Option<String>,
    token: Option<String>,
}

impl HttpTrackingSink {
    pub fn new(endpoint: Option<String>, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TRACKING_SINK_TIMEOUT_SECONDS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self {
            client,
            endpoint,
            token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.error_tracking_url.clone(),
            config.error_tracking_token().map(str::to_string),
        )
    }
}

#[async_trait]
impl TrackingSink for HttpTrackingSink {
    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn send(&self, event: &ErrorEvent) -> Result<(), SinkError> {
        let endpoint = self.endpoint.as_deref().ok_or(SinkError::NotConfigured)?;

        let mut request = self
            .client
            .post(endpoint)
            .json(&TrackingPayload::from(event));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SinkError::Timeout
            } else {
                SinkError::Unavailable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(SinkError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
