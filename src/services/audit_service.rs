//! Read access to the admin audit trail.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::AuditRecord;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{HistoryPage, HistoryParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Newest entries first
    async fn history(&self, params: HistoryParams) -> AppResult<HistoryPage<AuditRecord>>;
}

pub struct AuditLog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AuditLog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuditService for AuditLog<U> {
    async fn history(&self, params: HistoryParams) -> AppResult<HistoryPage<AuditRecord>> {
        let (limit, offset) = (params.limit(), params.offset());
        let (entries, total) = self.uow.audit().list(limit, offset).await?;
        Ok(HistoryPage {
            entries,
            total,
            limit,
            offset,
        })
    }
}
