//! Test helpers for the import pipeline
//!
//! In-memory implementations of [`ExerciseCatalog`](coachdeck_db::ExerciseCatalog)
//! and [`Storage`](coachdeck_storage::Storage) plus file fixtures, so the
//! pipeline can be exercised without a database or a bucket.

pub mod memory_catalog;
pub mod memory_storage;

pub use memory_catalog::MemoryCatalog;
pub use memory_storage::MemoryStorage;

use coachdeck_core::constants::content_type_for_extension;
use coachdeck_core::models::MediaFile;

use crate::filename::file_extension;

/// A small non-empty media file named `filename`.
pub fn video(filename: &str) -> MediaFile {
    let extension = file_extension(filename).unwrap_or_default();
    MediaFile::new(
        filename,
        content_type_for_extension(&extension),
        format!("fake media bytes for {}", filename).into_bytes(),
    )
}
