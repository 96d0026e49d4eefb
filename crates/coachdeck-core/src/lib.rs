//! Coachdeck Core Library
//!
//! Domain models, error types, configuration and constants shared by the
//! storage, catalog, import and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ImportConfig};
pub use error::AppError;
pub use storage_types::StorageBackend;
