//! Storefront interaction log and the 30-day popularity aggregate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, FromQueryResult, NotSet, Set,
    Statement,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::product_interaction::ActiveModel;
use crate::domain::{InteractionKind, PopularityStats};
use crate::errors::AppResult;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn record(&self, product_id: Uuid, kind: InteractionKind) -> AppResult<()>;
    /// Per-product interaction counts since `since`
    async fn stats_since(&self, since: DateTime<Utc>) -> AppResult<Vec<(Uuid, PopularityStats)>>;
}

/// SeaORM-backed interaction repository
pub struct InteractionStore {
    db: DatabaseConnection,
}

impl InteractionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct StatsRow {
    product_id: Uuid,
    views: i64,
    clicks: i64,
    favorites: i64,
}

const STATS_SQL: &str = r#"
SELECT product_id,
       COUNT(*) FILTER (WHERE kind = 'view') AS views,
       COUNT(*) FILTER (WHERE kind = 'click') AS clicks,
       COUNT(*) FILTER (WHERE kind = 'favorite') AS favorites
FROM product_interactions
WHERE created_at >= $1
GROUP BY product_id
"#;

#[async_trait]
impl InteractionRepository for InteractionStore {
    async fn record(&self, product_id: Uuid, kind: InteractionKind) -> AppResult<()> {
        let active = ActiveModel {
            id: NotSet,
            product_id: Set(product_id),
            kind: Set(kind.as_str().to_string()),
            created_at: Set(Utc::now()),
        };
        active.insert(&self.db).await?;
        Ok(())
    }

    async fn stats_since(&self, since: DateTime<Utc>) -> AppResult<Vec<(Uuid, PopularityStats)>> {
        let statement = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            STATS_SQL,
            [since.into()],
        );
        let rows = StatsRow::find_by_statement(statement).all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.product_id,
                    PopularityStats {
                        views_30d: row.views.max(0) as u64,
                        clicks_30d: row.clicks.max(0) as u64,
                        favorites_30d: row.favorites.max(0) as u64,
                    },
                )
            })
            .collect())
    }
}
