//! Hand-written fakes shared by the integration tests.
//!
//! Nothing here touches a database, Redis or the network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use obra_catalog::api::{create_router, AppState};
use obra_catalog::config::Config;
use obra_catalog::domain::{
    Actor, AdminProductResponse, AdminUserResponse, AuditRecord, CategoryResponse,
    InteractionKind, PopularityWeights, ProductDraft, ProductFilter, ProductResponse, UserRole,
};
use obra_catalog::errors::{AppError, AppResult};
use obra_catalog::infra::{ErrorFallbackRepository, InMemoryRateLimiter};
use obra_catalog::services::{
    AuditService, AuthService, CatalogQuery, CatalogService, CategoryDeletion, CategoryDetail,
    CategoryInput, CategoryService, Claims, NewUser, PopularProduct, Principal, ProductService,
    ServiceContainer, TokenResponse, UserService, UserUpdate,
};
use obra_catalog::telemetry::{
    ErrorEvent, ErrorIngestService, ErrorReporter, SinkError, TrackingSink,
};
use obra_catalog::types::{HistoryPage, HistoryParams, Paginated, PaginationParams};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const EDITOR_TOKEN: &str = "editor-token";

// =============================================================================
// Services
// =============================================================================

pub struct FakeAuth {
    pub admin_id: Uuid,
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        if email == "jefe@example.cl" && password == "Hormigon2024!" {
            Ok(TokenResponse {
                access_token: ADMIN_TOKEN.to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 86400,
            })
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    fn verify_token(&self, _token: &str) -> AppResult<Claims> {
        Err(AppError::Unauthorized)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Principal> {
        match token {
            ADMIN_TOKEN => Ok(Principal {
                actor: Actor::new(Some(self.admin_id), "jefe@example.cl"),
                role: UserRole::Admin,
            }),
            EDITOR_TOKEN => Ok(Principal {
                actor: Actor::new(Some(Uuid::new_v4()), "bodega@example.cl"),
                role: UserRole::Editor,
            }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// Storefront with no products at all
pub struct EmptyCatalog;

#[async_trait]
impl CatalogService for EmptyCatalog {
    async fn categories(&self) -> AppResult<Vec<CategoryResponse>> {
        Ok(vec![])
    }

    async fn category_by_slug(
        &self,
        _slug: &str,
        _pagination: PaginationParams,
    ) -> AppResult<CategoryDetail> {
        Err(AppError::NotFound)
    }

    async fn products(&self, query: CatalogQuery) -> AppResult<Paginated<ProductResponse>> {
        Ok(Paginated::from_params(vec![], &query.pagination, 0))
    }

    async fn product(&self, _id: Uuid) -> AppResult<ProductResponse> {
        Err(AppError::NotFound)
    }

    async fn record_interaction(&self, _id: Uuid, _kind: InteractionKind) -> AppResult<()> {
        Err(AppError::NotFound)
    }

    async fn popular(
        &self,
        _limit: u64,
        _weights: PopularityWeights,
    ) -> AppResult<Vec<PopularProduct>> {
        Ok(vec![])
    }
}

/// Records delete calls; everything else is a not-found
#[derive(Default)]
pub struct FakeCategories {
    pub deleted: Mutex<Vec<(Uuid, bool, Actor)>>,
}

#[async_trait]
impl CategoryService for FakeCategories {
    async fn list(&self) -> AppResult<Vec<CategoryResponse>> {
        Ok(vec![])
    }

    async fn create(&self, _input: CategoryInput, _actor: Actor) -> AppResult<CategoryResponse> {
        Err(AppError::conflict("Una categoría con ese slug"))
    }

    async fn update(
        &self,
        _id: Uuid,
        _input: CategoryInput,
        _actor: Actor,
    ) -> AppResult<CategoryResponse> {
        Err(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid, cascade: bool, actor: Actor) -> AppResult<CategoryDeletion> {
        self.deleted.lock().unwrap().push((id, cascade, actor));
        Ok(CategoryDeletion {
            category_id: id,
            deleted_products: if cascade { 2 } else { 0 },
        })
    }
}

pub struct NoProducts;

#[async_trait]
impl ProductService for NoProducts {
    async fn list(
        &self,
        _filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<AdminProductResponse>> {
        Ok(Paginated::from_params(vec![], &pagination, 0))
    }

    async fn get(&self, _id: Uuid) -> AppResult<AdminProductResponse> {
        Err(AppError::NotFound)
    }

    async fn create(&self, _draft: ProductDraft, _actor: Actor) -> AppResult<AdminProductResponse> {
        Err(AppError::validation("La categoría indicada no existe"))
    }

    async fn update(
        &self,
        _id: Uuid,
        _draft: ProductDraft,
        _actor: Actor,
    ) -> AppResult<AdminProductResponse> {
        Err(AppError::NotFound)
    }

    async fn delete(&self, _id: Uuid, _actor: Actor) -> AppResult<()> {
        Err(AppError::NotFound)
    }
}

pub struct NoUsers;

#[async_trait]
impl UserService for NoUsers {
    async fn list_users(&self) -> AppResult<Vec<AdminUserResponse>> {
        Ok(vec![])
    }

    async fn create_user(&self, _user: NewUser, _actor: Actor) -> AppResult<AdminUserResponse> {
        Err(AppError::conflict("Un usuario con ese correo"))
    }

    async fn update_user(
        &self,
        _id: Uuid,
        _update: UserUpdate,
        _actor: Actor,
    ) -> AppResult<AdminUserResponse> {
        Err(AppError::NotFound)
    }

    async fn set_enabled(
        &self,
        _id: Uuid,
        _enabled: bool,
        _actor: Actor,
    ) -> AppResult<AdminUserResponse> {
        Err(AppError::NotFound)
    }

    async fn delete_user(&self, id: Uuid, actor: Actor) -> AppResult<()> {
        if actor.id == Some(id) {
            return Err(AppError::validation("No puedes eliminar tu propia cuenta"));
        }
        Ok(())
    }
}

pub struct EmptyAudit;

#[async_trait]
impl AuditService for EmptyAudit {
    async fn history(&self, params: HistoryParams) -> AppResult<HistoryPage<AuditRecord>> {
        Ok(HistoryPage {
            entries: vec![],
            total: 0,
            limit: params.limit(),
            offset: params.offset(),
        })
    }
}

pub struct FakeServices {
    pub auth: Arc<FakeAuth>,
    pub categories: Arc<FakeCategories>,
}

impl FakeServices {
    pub fn new() -> Self {
        Self {
            auth: Arc::new(FakeAuth {
                admin_id: Uuid::new_v4(),
            }),
            categories: Arc::new(FakeCategories::default()),
        }
    }
}

impl ServiceContainer for FakeServices {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        Arc::new(EmptyCatalog)
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        Arc::new(NoProducts)
    }

    fn users(&self) -> Arc<dyn UserService> {
        Arc::new(NoUsers)
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        Arc::new(EmptyAudit)
    }
}

// =============================================================================
// Telemetry
// =============================================================================

/// Fallback table keyed like the real one: (fingerprint, bucket)
#[derive(Default)]
pub struct MemoryFallbackStore {
    rows: Mutex<HashMap<(String, DateTime<Utc>), i64>>,
    pub fail: bool,
}

impl MemoryFallbackStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn total_occurrences(&self) -> i64 {
        self.rows.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ErrorFallbackRepository for MemoryFallbackStore {
    async fn upsert(&self, event: ErrorEvent, bucket: DateTime<Utc>) -> AppResult<i64> {
        if self.fail {
            return Err(AppError::internal("relation \"error_fallback\" does not exist"));
        }
        let mut rows = self.rows.lock().unwrap();
        let occurrences = rows.entry((event.fingerprint, bucket)).or_insert(0);
        *occurrences += 1;
        Ok(*occurrences)
    }
}

/// Configured sink that remembers what it was sent
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<ErrorEvent>>,
    count: AtomicUsize,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<ErrorEvent> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for background reports to land.
    pub async fn wait_for(&self, expected: usize) -> usize {
        for _ in 0..50 {
            if self.count.load(Ordering::SeqCst) >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackingSink for RecordingSink {
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, event: &ErrorEvent) -> Result<(), SinkError> {
        self.sent.lock().unwrap().push(event.clone());
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// App
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub services: Arc<FakeServices>,
    pub store: Arc<MemoryFallbackStore>,
    pub sink: Arc<RecordingSink>,
}

impl TestApp {
    pub fn new(environment: &str) -> Self {
        Self::with_store(environment, MemoryFallbackStore::default())
    }

    pub fn with_store(environment: &str, store: MemoryFallbackStore) -> Self {
        let config = Config::for_tests(environment);
        let services = Arc::new(FakeServices::new());
        let store = Arc::new(store);
        let sink = Arc::new(RecordingSink::default());
        let limiter = Arc::new(InMemoryRateLimiter::new());

        let ingest = Arc::new(ErrorIngestService::new(store.clone(), limiter.clone(), &config));
        let reporter = Arc::new(ErrorReporter::new(sink.clone(), ingest.clone(), &config));
        let state = AppState::new(services.clone(), ingest, reporter, limiter, config);

        Self {
            router: create_router(state),
            services,
            store,
            sink,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        read(response).await
    }
}

pub async fn read(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("X-Forwarded-For", "200.1.2.3");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
