//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction lifecycle. The
//! transactional repositories expose only what multi-step admin workflows
//! need (cascade delete with its audit trail).

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::shared;
use super::repositories::{
    AuditRepository, AuditStore, CategoryRepository, CategoryStore, ErrorFallbackRepository,
    ErrorFallbackStore, InteractionRepository, InteractionStore, ProductRepository, ProductStore,
    ProfileRepository, ProfileStore,
};
use crate::domain::{AuditRecord, Category, NewAuditRecord};
use crate::errors::{AppError, AppResult};

/// Boxed transactional body
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction method; tests
/// use a hand-written implementation over repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn categories(&self) -> Arc<dyn CategoryRepository>;
    fn products(&self) -> Arc<dyn ProductRepository>;
    fn profiles(&self) -> Arc<dyn ProfileRepository>;
    fn audit(&self) -> Arc<dyn AuditRepository>;
    fn interactions(&self) -> Arc<dyn InteractionRepository>;
    fn error_fallback(&self) -> Arc<dyn ErrorFallbackRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure succeeds, rolled back when it fails.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn categories(&self) -> TxCategoryRepository<'_> {
        TxCategoryRepository { txn: self.txn }
    }

    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository { txn: self.txn }
    }

    pub fn audit(&self) -> TxAuditRepository<'_> {
        TxAuditRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    categories: Arc<CategoryStore>,
    products: Arc<ProductStore>,
    profiles: Arc<ProfileStore>,
    audit: Arc<AuditStore>,
    interactions: Arc<InteractionStore>,
    error_fallback: Arc<ErrorFallbackStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            categories: Arc::new(CategoryStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            profiles: Arc::new(ProfileStore::new(db.clone())),
            audit: Arc::new(AuditStore::new(db.clone())),
            interactions: Arc::new(InteractionStore::new(db.clone())),
            error_fallback: Arc::new(ErrorFallbackStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn audit(&self) -> Arc<dyn AuditRepository> {
        self.audit.clone()
    }

    fn interactions(&self) -> Arc<dyn InteractionRepository> {
        self.interactions.clone()
    }

    fn error_fallback(&self) -> Arc<dyn ErrorFallbackRepository> {
        self.error_fallback.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Category operations inside a transaction
pub struct TxCategoryRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCategoryRepository<'a> {
    /// Lookup that sees rows written earlier in the same transaction
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        shared::find_category(self.txn, id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        shared::delete_category(self.txn, id).await
    }
}

/// Product operations inside a transaction
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    pub async fn ids_by_category(&self, category_id: Uuid) -> AppResult<Vec<Uuid>> {
        shared::product_ids_by_category(self.txn, category_id).await
    }

    pub async fn title(&self, id: Uuid) -> AppResult<Option<String>> {
        shared::find_product_title(self.txn, id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        shared::delete_product(self.txn, id).await
    }
}

/// Audit appends inside a transaction
pub struct TxAuditRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAuditRepository<'a> {
    pub async fn append(&self, record: NewAuditRecord) -> AppResult<AuditRecord> {
        shared::append_audit(self.txn, record).await
    }
}

/// Run a block inside `$uow.transaction`, boxing the future.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
