//! In-memory ZIP assembly.

use crate::{models::object::ObjectRecord, services::storage_service::StorageResult};
use std::io::{Cursor, Write};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Write `records` into a single DEFLATE-compressed ZIP and return its bytes.
///
/// Entries are named by object key and written in input order; nothing is
/// sorted or deduplicated. The zip writer refuses a repeated entry name, so
/// duplicate keys surface as `StorageError::Archive` instead of producing two
/// entries with the same name. Keys from a single bucket listing are unique,
/// so this only happens when callers pass records that did not come from one.
pub fn build_zip(records: &[ObjectRecord]) -> StorageResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for record in records {
        writer.start_file(record.key.as_str(), options)?;
        writer.write_all(&record.body)?;
    }

    Ok(writer.finish()?.into_inner())
}
