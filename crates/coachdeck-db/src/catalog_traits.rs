//! Trait-based catalog abstraction
//!
//! Lets the import pipeline run against Postgres in production and against an
//! in-memory catalog in tests.

use async_trait::async_trait;
use coachdeck_core::models::NewExercise;
use coachdeck_core::AppError;
use std::collections::HashSet;
use uuid::Uuid;

#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Names of every exercise visible to `owner_id`, as stored.
    async fn list_names(&self, owner_id: Uuid) -> Result<HashSet<String>, AppError>;

    /// Append one record and return its id. Existing records are never touched.
    async fn insert(&self, exercise: NewExercise) -> Result<Uuid, AppError>;
}
