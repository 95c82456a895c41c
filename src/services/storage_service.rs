//! src/services/storage_service.rs
//!
//! The object-store collaborator contract. The archiver only consumes these
//! operations; `S3Storage` implements them against S3 and tests substitute an
//! in-memory store.

use crate::models::{bucket::Bucket, object::ObjectKey};
use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use thiserror::Error;

/// Boxed transport error coming out of a storage backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("object `{key}` not found in bucket `{bucket}`")]
    ObjectNotFound { bucket: String, key: String },
    #[error("listing `{prefix}` in bucket `{bucket}` failed: {source}")]
    List {
        bucket: String,
        prefix: String,
        source: BoxError,
    },
    #[error("fetching `{key}` from bucket `{bucket}` failed: {source}")]
    Fetch {
        bucket: String,
        key: String,
        source: BoxError,
    },
    #[error("listing buckets failed: {0}")]
    ListBuckets(#[source] BoxError),
    #[error("writing archive failed: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Read-only view of an object store.
///
/// Implementations are shared across requests behind an `Arc`, so they must
/// be `Send + Sync` and hold no per-request state.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List every key in `bucket` starting with `prefix`, in store order.
    ///
    /// Pages through the whole listing. No matches yields an empty vector.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<ObjectKey>>;

    /// Download the full body of a single object.
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;

    /// List the buckets visible to the current credentials.
    async fn list_buckets(&self) -> StorageResult<Vec<Bucket>>;
}
