//! Audit history handler (admin only).

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::AuditRecord;
use crate::errors::AppResult;
use crate::types::{HistoryPage, HistoryParams};

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/", get(history))
}

/// Audit entries, newest first
#[utoipa::path(
    get,
    path = "/api/admin/history",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(HistoryParams),
    responses(
        (status = 200, description = "Page of audit entries"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<HistoryPage<AuditRecord>>> {
    Ok(Json(state.services.audit().history(params).await?))
}
