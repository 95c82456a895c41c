//! Core data models for the archiver.
//!
//! Objects and buckets mirror what the object store reports; the gateway
//! types describe the proxy request/response envelope exchanged with the
//! managed HTTP front door.

pub mod bucket;
pub mod gateway;
pub mod object;
