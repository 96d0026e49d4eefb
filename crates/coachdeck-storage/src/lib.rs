//! Coachdeck Storage Library
//!
//! Blob storage abstraction for imported exercise media, with local filesystem
//! and S3 implementations.
//!
//! # Storage key format
//!
//! Import keys are owner-scoped: `{prefix}/{owner_id}/{timestamp_ms}_{upload_id}_{sanitized_filename}`.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use coachdeck_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{generate_import_key, sanitize_filename};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
