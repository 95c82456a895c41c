//! Represents a logical bucket as reported by the object store.

use chrono::{DateTime, Utc};

/// A storage bucket visible to the configured credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    /// Globally unique bucket name.
    pub name: String,

    /// When this bucket was created, if the store reports it.
    pub creation_date: Option<DateTime<Utc>>,
}
