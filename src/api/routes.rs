//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_category_routes, admin_product_routes, admin_user_routes, auth_routes, catalog_routes,
    debug_routes, history_routes, telemetry_routes,
};
use super::middleware::{
    auth_middleware, panic_response, rate_limit_auth_middleware, rate_limit_middleware,
    report_server_errors, require_admin, require_catalog_editor,
};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let mut api = Router::new()
        // Login gets the stricter limit
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .merge(catalog_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        )))
        // Has its own per-actor limit
        .merge(telemetry_routes())
        .nest(
            "/admin",
            admin_routes(&state).route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            )),
        );

    if !state.config.is_production() {
        api = api.nest("/debug", debug_routes());
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        // Outermost last: the reporter sees the 500 built from a caught panic
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            report_server_errors,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Back-office routes; authentication runs before the role checks.
fn admin_routes(state: &AppState) -> Router<AppState> {
    let catalog = Router::new()
        .nest("/categories", admin_category_routes())
        .nest("/products", admin_product_routes())
        .route_layer(middleware::from_fn(require_catalog_editor));

    let accounts = Router::new()
        .nest("/users", admin_user_routes())
        .nest("/history", history_routes())
        .route_layer(middleware::from_fn(require_admin));

    catalog
        .merge(accounts)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

async fn root() -> &'static str {
    "Obra Catalog API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    /// Failure detail is logged always and returned only outside production.
    fn from_result<E: std::fmt::Display>(
        service: &str,
        result: Option<Result<(), E>>,
        production: bool,
    ) -> Self {
        match result {
            Some(Ok(())) => Self {
                status: "healthy",
                error: None,
            },
            Some(Err(e)) => {
                tracing::error!(service, error = %e, "Health check failed");
                Self {
                    status: "unhealthy",
                    error: (!production).then(|| e.to_string()),
                }
            }
            None => Self {
                status: "not_configured",
                error: None,
            },
        }
    }

    fn is_unhealthy(&self) -> bool {
        self.status == "unhealthy"
    }
}

/// Database and Redis connectivity
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, redis) = futures::join!(
        async {
            match &state.database {
                Some(db) => Some(db.ping().await),
                None => None,
            }
        },
        async {
            match &state.cache {
                Some(cache) => Some(cache.ping().await),
                None => None,
            }
        }
    );

    let production = state.config.is_production();
    let services = ServiceHealth {
        database: ServiceStatus::from_result("database", database, production),
        redis: ServiceStatus::from_result("redis", redis, production),
    };
    let degraded = services.database.is_unhealthy() || services.redis.is_unhealthy();

    let status_code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    let response = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        services,
    };

    (status_code, Json(response))
}
