//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_category_handler, admin_product_handler, admin_user_handler, auth_handler,
    catalog_handler, history_handler, telemetry_handler,
};
use crate::domain::{
    AdminProductResponse, AdminUserResponse, AuditAction, AuditRecord, CategoryResponse,
    Dimensions, InteractionKind, PopularityStats, ProductPopularity, ProductResource,
    ProductResponse, ProductSort, QuickSpec, StockStatus, UserRole, UserStatus,
};
use crate::errors::FieldError;
use crate::services::{CategoryDeletion, CategoryDetail, PopularProduct, TokenResponse};
use crate::telemetry::{ErrorEventInput, Severity, SkipReason, Source};
use crate::types::{MessageResponse, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Obra Catalog API",
        version = "0.1.0",
        description = "Construction-materials storefront and back office",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        catalog_handler::list_categories,
        catalog_handler::get_category,
        catalog_handler::list_products,
        catalog_handler::popular_products,
        catalog_handler::get_product,
        catalog_handler::record_interaction,
        admin_category_handler::list_categories,
        admin_category_handler::create_category,
        admin_category_handler::update_category,
        admin_category_handler::delete_category,
        admin_product_handler::list_products,
        admin_product_handler::get_product,
        admin_product_handler::create_product,
        admin_product_handler::update_product,
        admin_product_handler::delete_product,
        admin_user_handler::list_users,
        admin_user_handler::create_user,
        admin_user_handler::update_user,
        admin_user_handler::delete_user,
        history_handler::history,
        telemetry_handler::log_error,
    ),
    components(
        schemas(
            // Catalog
            CategoryResponse,
            ProductResponse,
            AdminProductResponse,
            StockStatus,
            ProductSort,
            Dimensions,
            QuickSpec,
            ProductResource,
            InteractionKind,
            PopularityStats,
            ProductPopularity,
            PopularProduct,
            CategoryDetail,
            CategoryDeletion,
            PaginationMeta,
            catalog_handler::InteractionRequest,
            admin_category_handler::CategoryRequest,
            admin_product_handler::ProductRequest,
            // Accounts
            UserRole,
            UserStatus,
            AdminUserResponse,
            AuditAction,
            AuditRecord,
            TokenResponse,
            auth_handler::LoginRequest,
            admin_user_handler::CreateUserRequest,
            admin_user_handler::UpdateUserRequest,
            // Telemetry
            ErrorEventInput,
            Severity,
            Source,
            SkipReason,
            telemetry_handler::IngestResponse,
            // Shared
            MessageResponse,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Back-office login"),
        (name = "Catalog", description = "Public storefront"),
        (name = "Admin", description = "Category and product administration"),
        (name = "Users", description = "Account management and audit history"),
        (name = "Telemetry", description = "Client error reporting")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from /api/auth/login, or the service-role key"))
                        .build(),
                ),
            );
        }
    }
}
