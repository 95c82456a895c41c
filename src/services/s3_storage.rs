//! S3-backed [`ObjectStorage`] using the AWS SDK.
//!
//! Region and credentials come from the standard AWS provider chain. An
//! explicit endpoint switches to path-style addressing so MinIO and other
//! S3-compatible services work too.

use crate::{
    models::{bucket::Bucket, object::ObjectKey},
    services::storage_service::{ObjectStorage, StorageError, StorageResult},
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{Client, primitives::DateTime as AwsDateTime};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration.
    pub async fn from_env(endpoint_url: Option<&str>) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(url) = endpoint_url {
            debug!("Using custom S3 endpoint {}", url);
            builder = builder.endpoint_url(url).force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<ObjectKey>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_no_such_bucket())
                {
                    StorageError::BucketNotFound(bucket.to_string())
                } else {
                    StorageError::List {
                        bucket: bucket.to_string(),
                        prefix: prefix.to_string(),
                        source: Box::new(err),
                    }
                }
            })?;

            // `Contents` is omitted entirely when a page has no matches.
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }

        Ok(keys)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_no_such_key())
                {
                    StorageError::ObjectNotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Fetch {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                        source: Box::new(err),
                    }
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|err| StorageError::Fetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: Box::new(err),
            })?;

        Ok(data.into_bytes())
    }

    async fn list_buckets(&self) -> StorageResult<Vec<Bucket>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|err| StorageError::ListBuckets(Box::new(err)))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| {
                Some(Bucket {
                    name: bucket.name()?.to_string(),
                    creation_date: bucket.creation_date().and_then(to_chrono),
                })
            })
            .collect())
    }
}

/// Convert an SDK timestamp, dropping values chrono cannot represent.
fn to_chrono(value: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(value.secs(), value.subsec_nanos())
}
