pub mod archive;
pub mod archive_service;
#[cfg(test)]
pub mod memory_storage;
pub mod s3_storage;
pub mod storage_service;
