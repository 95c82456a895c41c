use anyhow::{Context, Result};
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;

use models::gateway::GatewayRequest;
use services::{archive_service::ArchiveService, s3_storage::S3Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + one-shot flags ---
    let (cfg, one_shot) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting bucket-archiver with config: {:?}", cfg);

    // --- Initialize object store client (shared across invocations) ---
    let storage = S3Storage::from_env(cfg.endpoint_url.as_deref()).await;
    let service = ArchiveService::new(
        Arc::new(storage),
        cfg.bucket_name.clone(),
        cfg.bucket_prefix.clone(),
        cfg.archive_filename.clone(),
    );

    // --- Handle one-shot mode ---
    if let Some(one_shot) = one_shot {
        let envelope = service
            .handle(&GatewayRequest::with_min_date(one_shot.min_date))
            .await?;
        let archive = envelope
            .decoded_body()
            .context("decoding archive body")?;
        tokio::fs::write(&one_shot.output, &archive)
            .await
            .with_context(|| format!("writing {}", one_shot.output.display()))?;
        tracing::info!(
            "Wrote {} bytes to {}",
            archive.len(),
            one_shot.output.display()
        );
        return Ok(()); // exit after one invocation
    }

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
