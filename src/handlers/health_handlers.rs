//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks the object store and the configured bucket

use crate::services::archive_service::ArchiveService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;

/// `GET /healthz`
///
/// Very small liveness probe — always returns 200 OK with a plain JSON body.
/// This endpoint should be cheap and never perform I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Readiness probe that:
/// 1. Lists buckets to confirm the store is reachable with the current credentials.
/// 2. Confirms the configured bucket is among them.
///
/// HTTP 200 when all checks pass, HTTP 503 when any check fails.
pub async fn readyz(State(service): State<ArchiveService>) -> impl IntoResponse {
    let (store_check, bucket_check) = match service.get_buckets().await {
        Ok(names) => {
            let bucket_check = if names.iter().any(|name| *name == service.bucket_name) {
                (true, None)
            } else {
                (
                    false,
                    Some(format!("bucket `{}` not visible", service.bucket_name)),
                )
            };
            ((true, None), bucket_check)
        }
        Err(e) => (
            (false, Some(format!("error: {}", e))),
            (false, Some("skipped: object store unreachable".to_string())),
        ),
    };

    let overall_ok = store_check.0 && bucket_check.0;

    let mut checks = HashMap::new();
    checks.insert(
        "object_store",
        CheckStatus {
            ok: store_check.0,
            error: store_check.1,
        },
    );
    checks.insert(
        "bucket",
        CheckStatus {
            ok: bucket_check.0,
            error: bucket_check.1,
        },
    );

    let body = ReadyResponse {
        status: if overall_ok {
            "ok".into()
        } else {
            "error".into()
        },
        checks,
    };

    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
