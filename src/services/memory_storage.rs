//! In-memory [`ObjectStorage`] used as the substitute collaborator in tests.

use crate::{
    models::{bucket::Bucket, object::ObjectKey},
    services::storage_service::{ObjectStorage, StorageError, StorageResult},
};
use async_trait::async_trait;
use bytes::Bytes;
use std::{
    collections::{BTreeMap, HashSet},
    io,
};

/// Buckets of objects kept in key order, like an S3 listing.
#[derive(Default)]
pub struct MemoryStorage {
    buckets: BTreeMap<String, BTreeMap<String, Bytes>>,
    failing_keys: HashSet<String>,
    failing_listing: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.buckets.entry(bucket.to_string()).or_default();
        self
    }

    pub fn with_object(mut self, bucket: &str, key: &str, body: impl Into<Bytes>) -> Self {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body.into());
        self
    }

    /// Make `get_object` fail with a transport error for `key`.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    /// Make every listing call fail with a transport error.
    pub fn failing_listing(mut self) -> Self {
        self.failing_listing = true;
        self
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<ObjectKey>> {
        if self.failing_listing {
            return Err(StorageError::List {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                source: Box::new(io::Error::other("connection reset")),
            });
        }
        let objects = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;

        Ok(objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        if self.failing_keys.contains(key) {
            return Err(StorageError::Fetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: Box::new(io::Error::other("access denied")),
            });
        }
        self.buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn list_buckets(&self) -> StorageResult<Vec<Bucket>> {
        Ok(self
            .buckets
            .keys()
            .map(|name| Bucket {
                name: name.clone(),
                creation_date: None,
            })
            .collect())
    }
}
