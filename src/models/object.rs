//! Represents an object (file) fetched from a bucket.

use bytes::Bytes;

/// Object key (path-like identifier within the bucket).
pub type ObjectKey = String;

/// A single object downloaded for archiving.
///
/// Records live only for the duration of one request: they are created by the
/// fetcher and consumed by the archive builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Key the object was stored under; becomes the archive entry name.
    pub key: ObjectKey,

    /// Full object payload.
    pub body: Bytes,
}

impl ObjectRecord {
    pub fn new(key: impl Into<ObjectKey>, body: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
        }
    }
}
