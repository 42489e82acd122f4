//! Integration tests for API endpoints.
//!
//! These tests use fake services to exercise routing, authentication,
//! validation and error reporting without a database or Redis.

mod common;

use serde_json::json;
use uuid::Uuid;

use common::{get, json, TestApp, ADMIN_TOKEN, EDITOR_TOKEN};

#[tokio::test]
async fn test_health_without_infrastructure() {
    let app = TestApp::new("development");
    let (status, body) = app.send(get("/health", None)).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["redis"]["status"], "not_configured");
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new("development");

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "jefe@example.cl", "password": "Hormigon2024!" }),
        ))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["token_type"], "Bearer");

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "jefe@example.cl", "password": "incorrecta" }),
        ))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_rejects_malformed_email() {
    let app = TestApp::new("development");
    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "no-es-correo", "password": "x" }),
        ))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["code"], "INVALID_PAYLOAD");
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_admin_requires_token() {
    let app = TestApp::new("development");

    let (status, body) = app.send(get("/api/admin/categories", None)).await;
    assert_eq!(status, 401);
    assert_eq!(body["success"], false);

    let (status, _) = app.send(get("/api/admin/categories", Some("forged"))).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_editor_limited_to_catalog() {
    let app = TestApp::new("development");

    let (status, _) = app
        .send(get("/api/admin/categories", Some(EDITOR_TOKEN)))
        .await;
    assert_eq!(status, 200);

    let (status, body) = app.send(get("/api/admin/users", Some(EDITOR_TOKEN))).await;
    assert_eq!(status, 403);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app
        .send(get("/api/admin/history", Some(EDITOR_TOKEN)))
        .await;
    assert_eq!(status, 403);

    let (status, body) = app
        .send(get("/api/admin/history?limit=1000", Some(ADMIN_TOKEN)))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["limit"], 200);
}

#[tokio::test]
async fn test_cascade_delete_passes_actor() {
    let app = TestApp::new("development");
    let id = Uuid::new_v4();

    let request = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/admin/categories/{}?cascade=true", id))
        .header("Authorization", format!("Bearer {}", ADMIN_TOKEN))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, 200);
    assert_eq!(body["deleted_products"], 2);

    let deleted = app.services.categories.deleted.lock().unwrap().clone();
    assert_eq!(deleted.len(), 1);
    let (deleted_id, cascade, actor) = &deleted[0];
    assert_eq!(*deleted_id, id);
    assert!(cascade);
    assert_eq!(actor.email, "jefe@example.cl");
}

#[tokio::test]
async fn test_category_validation_details() {
    let app = TestApp::new("development");
    let (status, body) = app
        .send(json(
            "POST",
            "/api/admin/categories",
            Some(ADMIN_TOKEN),
            json!({ "name": "" }),
        ))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["details"][0]["field"], "name");
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::new("development");
    let me = app.services.auth.admin_id;

    let request = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/admin/users?id={}", me))
        .header("Authorization", format!("Bearer {}", ADMIN_TOKEN))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_user_patch_without_changes() {
    let app = TestApp::new("development");
    let (status, _) = app
        .send(json(
            "PATCH",
            "/api/admin/users",
            Some(ADMIN_TOKEN),
            json!({ "id": Uuid::new_v4() }),
        ))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_catalog_filters() {
    let app = TestApp::new("development");

    let (status, body) = app.send(get("/api/products?page=2&per_page=10", None)).await;
    assert_eq!(status, 200);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["per_page"], 10);

    let (status, body) = app.send(get("/api/products?stock=agotado", None)).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_not_found_is_not_reported() {
    let app = TestApp::new("development");
    let (status, body) = app
        .send(get(&format!("/api/products/{}", Uuid::new_v4()), None))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.sink.wait_for(1).await, 0);
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let app = TestApp::new("development");
    let (status, body) = app.send(get("/api/debug/error", None)).await;

    assert_eq!(status, 500);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(app.sink.wait_for(1).await, 1);

    let sent = app.sink.sent();
    assert_eq!(sent[0].route, "/api/debug/error");
    assert_eq!(sent[0].message, "debug error endpoint");
    assert!(!sent[0].critical);
}

#[tokio::test]
async fn test_panic_is_reported_as_critical() {
    let app = TestApp::new("development");
    let (status, _) = app.send(get("/api/debug/panic", None)).await;

    assert_eq!(status, 500);
    assert_eq!(app.sink.wait_for(1).await, 1);
    assert!(app.sink.sent()[0].critical);

    // Critical reports are also kept in the fallback store
    for _ in 0..50 {
        if app.store.row_count() == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(app.store.row_count(), 1);
}

#[tokio::test]
async fn test_debug_routes_hidden_in_production() {
    let app = TestApp::new("production");
    let (status, _) = app.send(get("/api/debug/error", None)).await;
    assert_eq!(status, 404);
}
