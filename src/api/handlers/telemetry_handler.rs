//! Client error ingest.

use axum::{
    extract::{FromRequest, Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::client_ip;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::telemetry::{ClientIdentity, ErrorEventInput, IngestOutcome, SkipReason};
use crate::types::Accepted;

const SESSION_HEADER: &str = "x-session-id";

/// Outcome of `POST /api/log-error`
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestResponse {
    Stored {
        #[schema(example = "3f1c9a0e...")]
        fingerprint: String,
        occurrences: i64,
    },
    Skipped {
        reason: SkipReason,
    },
}

pub fn telemetry_routes() -> Router<AppState> {
    Router::new().route("/log-error", post(log_error))
}

fn identity(headers: &HeaderMap, ip: String) -> ClientIdentity {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    ClientIdentity { ip, session_id }
}

/// Store a client error event in the fallback table
#[utoipa::path(
    post,
    path = "/api/log-error",
    tag = "Telemetry",
    request_body = ErrorEventInput,
    responses(
        (status = 201, description = "First occurrence stored", body = IngestResponse),
        (status = 200, description = "Occurrence merged into an existing row", body = IngestResponse),
        (status = 202, description = "Accepted but not stored", body = IngestResponse),
        (status = 400, description = "Validation error with field details"),
        (status = 500, description = "Fallback store unavailable")
    )
)]
pub async fn log_error(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Response> {
    let client = identity(request.headers(), client_ip(&request));
    let ValidatedJson(input) =
        ValidatedJson::<ErrorEventInput>::from_request(request, &state).await?;

    let response = match state.ingest.ingest(input, &client).await? {
        IngestOutcome::Skipped(reason) => {
            Accepted(IngestResponse::Skipped { reason }).into_response()
        }
        IngestOutcome::Stored {
            fingerprint,
            occurrences,
        } => {
            let status = if occurrences == 1 {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(IngestResponse::Stored {
                    fingerprint,
                    occurrences,
                }),
            )
                .into_response()
        }
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_reads_session_header() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static(" sess-1 "));
        let client = identity(&headers, "10.0.0.1".to_string());
        assert_eq!(client.session_id.as_deref(), Some("sess-1"));

        let client = identity(&HeaderMap::new(), "10.0.0.1".to_string());
        assert!(client.session_id.is_none());
    }

    #[test]
    fn test_response_shapes() {
        let skipped = serde_json::to_value(IngestResponse::Skipped {
            reason: SkipReason::RateLimited,
        })
        .unwrap();
        assert_eq!(skipped["status"], "skipped");
        assert_eq!(skipped["reason"], "rate_limited");

        let stored = serde_json::to_value(IngestResponse::Stored {
            fingerprint: "abc".to_string(),
            occurrences: 2,
        })
        .unwrap();
        assert_eq!(stored["status"], "stored");
        assert_eq!(stored["occurrences"], 2);
    }
}
