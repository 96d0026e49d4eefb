//! Bulk import of exercise videos into the catalog
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`collector`] turns paths into [`MediaFile`]s without touching their bytes.
//! 2. [`analyzer`] classifies each file as new, duplicate or invalid, reading
//!    the catalog exactly once.
//! 3. [`importer`] uploads every new file and appends its catalog record, one
//!    file at a time, reporting progress after each.
//! 4. [`report`] summarizes the results and serializes the downloadable report.
//!
//! Catalog and storage are injected as [`ExerciseCatalog`] and [`Storage`]
//! trait objects; [`test_helpers`] provides in-memory implementations.

pub mod analyzer;
pub mod collector;
pub mod filename;
pub mod importer;
pub mod report;
// In-memory catalog and storage, public so integration tests can use them
pub mod test_helpers;

pub use analyzer::{classify, ImportAnalyzer};
pub use collector::collect_paths;
pub use filename::{exercise_name, file_extension, is_supported_extension, parse_exercise_metadata};
pub use importer::{BatchImporter, ImportStage, ImportTask, ProgressSink};
pub use report::{render_analysis, render_summary, ImportReport, ImportSummary};

pub use coachdeck_core::models::{
    FileAnalysis, FileClassification, ImportAnalysis, ImportProgress, ImportResult, ImportStatus,
    MediaFile, ParsedExerciseMetadata,
};
pub use coachdeck_db::ExerciseCatalog;
pub use coachdeck_storage::Storage;
