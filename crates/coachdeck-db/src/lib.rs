//! Coachdeck catalog persistence
//!
//! The importer only sees the [`ExerciseCatalog`] trait; [`ExerciseRepository`]
//! is its Postgres implementation.

pub mod catalog_traits;
pub mod db;

pub use catalog_traits::ExerciseCatalog;
pub use db::{connect, run_migrations, ExerciseRepository};
