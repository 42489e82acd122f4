//! Fallback store for error events: one row per (fingerprint, bucket).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    DatabaseConnection, EntityTrait, NotSet, Set,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::error_fallback::{self, ActiveModel, Entity as ErrorFallbackEntity};
use crate::errors::AppResult;
use crate::telemetry::ErrorEvent;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ErrorFallbackRepository: Send + Sync {
    /// Insert the event or bump the occurrence counter of its dedup row.
    /// Returns the occurrence count after the write.
    async fn upsert(&self, event: ErrorEvent, bucket: DateTime<Utc>) -> AppResult<i64>;
}

/// SeaORM-backed fallback store
pub struct ErrorFallbackStore {
    db: DatabaseConnection,
}

impl ErrorFallbackStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ErrorFallbackRepository for ErrorFallbackStore {
    async fn upsert(&self, event: ErrorEvent, bucket: DateTime<Utc>) -> AppResult<i64> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            fingerprint: Set(event.fingerprint),
            bucket: Set(bucket),
            severity: Set(event.severity.as_str().to_string()),
            source: Set(event.source.as_str().to_string()),
            route: Set(event.route),
            action: Set(event.action),
            message: Set(event.message),
            stack: Set(event.stack),
            environment: Set(event.environment),
            release: Set(event.release),
            context: Set(event.context),
            actor_hash: Set(event.actor_hash),
            occurrences: Set(1),
            first_seen: Set(now),
            last_seen: Set(now),
        };

        let on_conflict = OnConflict::columns([
            error_fallback::Column::Fingerprint,
            error_fallback::Column::Bucket,
        ])
        .value(
            error_fallback::Column::Occurrences,
            Expr::col((ErrorFallbackEntity, error_fallback::Column::Occurrences)).add(1),
        )
        .update_column(error_fallback::Column::LastSeen)
        .to_owned();

        let model = ErrorFallbackEntity::insert(active)
            .on_conflict(on_conflict)
            .exec_with_returning(&self.db)
            .await?;
        Ok(model.occurrences)
    }
}
