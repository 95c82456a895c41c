//! src/services/archive_service.rs
//!
//! ArchiveService — the list → fetch → zip → encode pipeline behind a single
//! invocation. Objects are fetched one at a time and the archive is held
//! entirely in memory; the first storage error aborts the request.

use crate::{
    models::{
        gateway::{GatewayRequest, GatewayResponse},
        object::{ObjectKey, ObjectRecord},
    },
    services::{
        archive::build_zip,
        storage_service::{ObjectStorage, StorageResult},
    },
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// `min_date` used when the request does not carry one.
pub const DEFAULT_MIN_DATE: &str = "2023-01-01";

#[derive(Clone)]
pub struct ArchiveService {
    /// Shared object-store client, reused across invocations.
    storage: Arc<dyn ObjectStorage>,

    /// Bucket holding the objects to archive.
    pub bucket_name: String,

    /// Only keys starting with this prefix are archived.
    pub prefix: String,

    /// Name advertised in the attachment disposition.
    pub archive_filename: String,
}

impl ArchiveService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        bucket_name: impl Into<String>,
        prefix: impl Into<String>,
        archive_filename: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            bucket_name: bucket_name.into(),
            prefix: prefix.into(),
            archive_filename: archive_filename.into(),
        }
    }

    /// List every key under the configured prefix.
    ///
    /// `min_date` is only recorded in the logs; it does not filter the listing.
    pub async fn list_files(&self, min_date: &str) -> StorageResult<Vec<ObjectKey>> {
        info!(
            "Listing files. Bucket: {}, Prefix: {}, Min Date: {}",
            self.bucket_name, self.prefix, min_date
        );

        let keys = self
            .storage
            .list_keys(&self.bucket_name, &self.prefix)
            .await
            .inspect_err(|err| error!("Couldn't list files in {}: {}", self.bucket_name, err))?;

        info!(count = keys.len(), "Fetched file list. Keys: {:?}", keys);
        Ok(keys)
    }

    /// Download each key in order. Stops at the first failure.
    pub async fn download_files(&self, keys: &[ObjectKey]) -> StorageResult<Vec<ObjectRecord>> {
        info!(
            "Downloading {} files. Bucket: {}",
            keys.len(),
            self.bucket_name
        );

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let body = self
                .storage
                .get_object(&self.bucket_name, key)
                .await
                .inspect_err(|err| error!("Couldn't download {}: {}", key, err))?;
            debug!(size = body.len(), "Downloaded {}", key);
            records.push(ObjectRecord::new(key.clone(), body));
        }

        let total: usize = records.iter().map(|record| record.body.len()).sum();
        info!(total_bytes = total, "Downloaded {} files", records.len());
        Ok(records)
    }

    /// Zip downloaded records into an in-memory archive.
    pub fn zip_files(&self, records: &[ObjectRecord]) -> StorageResult<Vec<u8>> {
        info!("Zipping {} files", records.len());
        let archive = build_zip(records)
            .inspect_err(|err| error!("Couldn't build archive: {}", err))?;
        info!(size = archive.len(), "Zipped {} files", records.len());
        Ok(archive)
    }

    /// Run list → fetch → zip and return the raw archive bytes.
    pub async fn download_and_zip(&self, min_date: &str) -> StorageResult<Vec<u8>> {
        let keys = self.list_files(min_date).await?;
        let records = self.download_files(&keys).await?;
        self.zip_files(&records)
    }

    /// Names of the buckets the client can see.
    pub async fn get_buckets(&self) -> StorageResult<Vec<String>> {
        let buckets = self
            .storage
            .list_buckets()
            .await
            .inspect_err(|err| error!("Couldn't get buckets: {}", err))?;
        Ok(buckets.into_iter().map(|bucket| bucket.name).collect())
    }

    /// Handle one gateway invocation end to end.
    ///
    /// Errors are returned without producing an envelope; the caller decides
    /// how the failure is surfaced.
    pub async fn handle(&self, request: &GatewayRequest) -> StorageResult<GatewayResponse> {
        let min_date = match request.query_param("min_date") {
            Some(value) => value,
            None => {
                warn!(
                    "Request has no min_date query parameter, falling back to {}",
                    DEFAULT_MIN_DATE
                );
                DEFAULT_MIN_DATE
            }
        };

        let archive = self.download_and_zip(min_date).await?;
        Ok(GatewayResponse::zip_attachment(
            &archive,
            &self.archive_filename,
        ))
    }
}
