//! Reports server failures produced by the router.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;

use crate::api::AppState;
use crate::errors::{AppError, ReportedError};
use crate::telemetry::{severity_for_status, Report};

/// Route whose own failures are already persisted by the ingest
const LOG_ERROR_PATH: &str = "/api/log-error";

/// Capture every 5xx response with the reporter, off the request path.
pub async fn report_server_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_server_error() || path == LOG_ERROR_PATH {
        return response;
    }
    let Some(severity) = severity_for_status(status.as_u16()) else {
        return response;
    };

    let reported = response.extensions().get::<ReportedError>().cloned();
    let (message, critical) = match reported {
        Some(reported) => (reported.message, reported.critical),
        None => (format!("HTTP {}", status.as_u16()), false),
    };

    let report = Report {
        severity,
        route: Some(path),
        action: Some(method.to_string()),
        message,
        critical,
        context: Some(serde_json::json!({ "status": status.as_u16() })),
        ..Report::default()
    };
    let reporter = state.reporter.clone();
    tokio::spawn(async move {
        reporter.capture(report).await;
    });

    response
}

/// `CatchPanicLayer` handler: generic 500 flagged as critical.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let mut response = AppError::internal(format!("panic: {}", detail)).into_response();
    if let Some(reported) = response.extensions_mut().get_mut::<ReportedError>() {
        reported.critical = true;
    }
    response
}
