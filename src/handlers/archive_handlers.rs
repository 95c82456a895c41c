//! HTTP handlers for archive downloads.
//!
//! `POST /invoke` speaks the gateway proxy contract directly. `GET /archive`
//! runs the same handler and renders the envelope the way the gateway would
//! to a client, decoding the base64 body back into raw bytes.

use crate::{
    errors::AppError,
    models::gateway::{GatewayRequest, GatewayResponse},
    services::archive_service::ArchiveService,
};
use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use serde::Deserialize;

/// Query params accepted by `GET /archive`.
#[derive(Debug, Deserialize)]
pub struct ArchiveQuery {
    pub min_date: Option<String>,
}

/// `POST /invoke` — gateway proxy event in, envelope out.
pub async fn invoke(
    State(service): State<ArchiveService>,
    Json(request): Json<GatewayRequest>,
) -> Result<Json<GatewayResponse>, AppError> {
    tracing::debug!("Received event: {:?}", request);
    let envelope = service.handle(&request).await?;
    Ok(Json(envelope))
}

/// `GET /archive?min_date=` — download the archive as a ZIP attachment.
pub async fn download_archive(
    State(service): State<ArchiveService>,
    Query(q): Query<ArchiveQuery>,
) -> Result<Response, AppError> {
    let request = GatewayRequest::with_min_date(q.min_date);
    let envelope = service.handle(&request).await?;
    render_envelope(envelope)
}

/// Turn a proxy envelope into the HTTP response it describes.
fn render_envelope(envelope: GatewayResponse) -> Result<Response, AppError> {
    let status = StatusCode::from_u16(envelope.status_code)
        .map_err(|_| AppError::internal(format!("invalid status {}", envelope.status_code)))?;
    let body = envelope
        .decoded_body()
        .map_err(|err| AppError::internal(format!("invalid base64 body: {}", err)))?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    for (name, value) in &envelope.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| AppError::internal(format!("invalid header name `{}`", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| AppError::internal(format!("invalid header value for `{}`", name)))?;
        headers.insert(name, value);
    }

    Ok(response)
}
