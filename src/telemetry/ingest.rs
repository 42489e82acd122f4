//! Fallback ingest: rate limit, sanitize, decide, deduplicate, persist.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use super::event::{ErrorEvent, ErrorEventInput, Severity};
use super::fingerprint::{actor_hash, time_bucket};
use crate::config::{
    Config, TELEMETRY_DEDUP_WINDOW_SECONDS, TELEMETRY_RATE_LIMIT_EVENTS,
    TELEMETRY_RATE_LIMIT_WINDOW_SECONDS,
};
use crate::errors::AppResult;
use crate::infra::{ErrorFallbackRepository, RateLimiter};

/// Who sent an event, as seen by the server
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub ip: String,
    pub session_id: Option<String>,
}

/// Why an accepted event was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    RateLimited,
    NotPersisted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Stored { fingerprint: String, occurrences: i64 },
    Skipped(SkipReason),
}

/// Accepts client- and server-side error events into the fallback store.
pub struct ErrorIngestService {
    store: Arc<dyn ErrorFallbackRepository>,
    limiter: Arc<dyn RateLimiter>,
    environment: String,
    release: String,
    production: bool,
}

impl ErrorIngestService {
    pub fn new(
        store: Arc<dyn ErrorFallbackRepository>,
        limiter: Arc<dyn RateLimiter>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            limiter,
            environment: config.environment.clone(),
            release: config.release.clone(),
            production: config.is_production(),
        }
    }

    /// Ingest a validated client payload.
    #[tracing::instrument(skip_all, fields(severity = input.severity.as_str(), critical = input.critical))]
    pub async fn ingest(
        &self,
        input: ErrorEventInput,
        client: &ClientIdentity,
    ) -> AppResult<IngestOutcome> {
        let session = input
            .session_id
            .clone()
            .or_else(|| client.session_id.clone());
        let actor = actor_hash(&client.ip, session.as_deref());

        if !self.allow(&actor).await {
            tracing::debug!(actor = %actor, "Error event rate limited");
            return Ok(IngestOutcome::Skipped(SkipReason::RateLimited));
        }

        let event = ErrorEvent::sanitize(input.into_raw(&self.environment, &self.release), actor);
        self.persist(event).await
    }

    /// Store the event if the persistence policy asks for it.
    pub async fn persist(&self, event: ErrorEvent) -> AppResult<IngestOutcome> {
        if !self.should_persist(&event) {
            return Ok(IngestOutcome::Skipped(SkipReason::NotPersisted));
        }
        self.store_event(event).await
    }

    /// Critical events always; otherwise only errors and above in production.
    pub fn should_persist(&self, event: &ErrorEvent) -> bool {
        event.critical || (self.production && event.severity >= Severity::Error)
    }

    /// Write the event, merging it into its dedup row.
    pub async fn store_event(&self, event: ErrorEvent) -> AppResult<IngestOutcome> {
        let bucket = time_bucket(event.occurred_at, TELEMETRY_DEDUP_WINDOW_SECONDS);
        let fingerprint = event.fingerprint.clone();
        let occurrences = self.store.upsert(event, bucket).await?;

        tracing::info!(
            fingerprint = %fingerprint,
            occurrences = occurrences,
            "Error event stored in fallback"
        );
        Ok(IngestOutcome::Stored {
            fingerprint,
            occurrences,
        })
    }

    /// Limiter failures fail open.
    async fn allow(&self, actor: &str) -> bool {
        let key = format!("telemetry:{}", actor);
        let window = Duration::from_secs(TELEMETRY_RATE_LIMIT_WINDOW_SECONDS);
        match self
            .limiter
            .hit(&key, TELEMETRY_RATE_LIMIT_EVENTS, window)
            .await
        {
            Ok(decision) => decision.allowed,
            Err(e) => {
                tracing::warn!(error = %e, "Telemetry rate limiter unavailable");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::{InMemoryRateLimiter, MockErrorFallbackRepository};

    fn service(store: MockErrorFallbackRepository, env: &str) -> ErrorIngestService {
        ErrorIngestService::new(
            Arc::new(store),
            Arc::new(InMemoryRateLimiter::new()),
            &Config::for_tests(env),
        )
    }

    fn client() -> ClientIdentity {
        ClientIdentity {
            ip: "200.1.2.3".to_string(),
            session_id: None,
        }
    }

    fn input(critical: bool) -> ErrorEventInput {
        ErrorEventInput {
            message: "TypeError: x is undefined".to_string(),
            route: Some("/productos".to_string()),
            critical,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_non_critical_outside_production_not_persisted() {
        let mut store = MockErrorFallbackRepository::new();
        store.expect_upsert().never();

        let outcome = service(store, "development")
            .ingest(input(false), &client())
            .await
            .unwrap();
        assert_eq!(outcome, IngestOutcome::Skipped(SkipReason::NotPersisted));
    }

    #[tokio::test]
    async fn test_production_error_stored_in_bucket() {
        let mut store = MockErrorFallbackRepository::new();
        store
            .expect_upsert()
            .withf(|event, bucket| {
                event.route == "/productos"
                    && event.actor_hash.len() == 64
                    && bucket.timestamp() % TELEMETRY_DEDUP_WINDOW_SECONDS == 0
            })
            .times(1)
            .returning(|_, _| Ok(3));

        let outcome = service(store, "production")
            .ingest(input(false), &client())
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Stored { occurrences: 3, .. }));
    }

    #[tokio::test]
    async fn test_actor_over_limit_is_skipped() {
        let mut store = MockErrorFallbackRepository::new();
        store
            .expect_upsert()
            .times(TELEMETRY_RATE_LIMIT_EVENTS as usize)
            .returning(|_, _| Ok(1));
        let ingest = service(store, "development");

        for _ in 0..TELEMETRY_RATE_LIMIT_EVENTS {
            let outcome = ingest.ingest(input(true), &client()).await.unwrap();
            assert!(matches!(outcome, IngestOutcome::Stored { .. }));
        }
        let outcome = ingest.ingest(input(true), &client()).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Skipped(SkipReason::RateLimited));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let mut store = MockErrorFallbackRepository::new();
        store
            .expect_upsert()
            .returning(|_, _| Err(AppError::internal("fallback table missing")));

        let result = service(store, "production")
            .ingest(input(true), &client())
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
