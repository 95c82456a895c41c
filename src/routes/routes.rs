//! Defines routes for the archiver.
//!
//! ## Structure
//! - `POST /invoke`  — gateway proxy event in, proxy envelope out
//! - `GET  /archive` — same invocation rendered as a ZIP download (`?min_date=`)
//! - `GET  /healthz` — liveness
//! - `GET  /readyz`  — readiness

use crate::{
    handlers::{
        archive_handlers::{download_archive, invoke},
        health_handlers::{healthz, readyz},
    },
    services::archive_service::ArchiveService,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build and return the router.
///
/// The router carries shared state (`ArchiveService`) to all handlers.
pub fn routes() -> Router<ArchiveService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/invoke", post(invoke))
        .route("/archive", get(download_archive))
}
