use async_trait::async_trait;
use coachdeck_core::models::{Exercise, NewExercise};
use coachdeck_core::AppError;
use sqlx::{PgPool, Postgres};
use std::collections::HashSet;
use uuid::Uuid;

use crate::catalog_traits::ExerciseCatalog;

/// Repository for the exercise catalog
#[derive(Clone)]
pub struct ExerciseRepository {
    pool: PgPool,
}

impl ExerciseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List exercises of one category, newest first
    #[tracing::instrument(skip(self), fields(db.table = "exercises", db.operation = "select"))]
    pub async fn list_by_category(
        &self,
        owner_id: Uuid,
        category: &str,
    ) -> Result<Vec<Exercise>, AppError> {
        let exercises = sqlx::query_as::<Postgres, Exercise>(
            r#"
            SELECT id, owner_id, name, difficulty, muscle_group, sets, reps, rest_time_secs,
                   video_url, category, description, created_at
            FROM exercises
            WHERE owner_id = $1 AND category = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }
}

#[async_trait]
impl ExerciseCatalog for ExerciseRepository {
    #[tracing::instrument(skip(self), fields(db.table = "exercises", db.operation = "select"))]
    async fn list_names(&self, owner_id: Uuid) -> Result<HashSet<String>, AppError> {
        let names = sqlx::query_scalar::<Postgres, String>(
            "SELECT name FROM exercises WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = names.len(), "Loaded catalog names");
        Ok(names.into_iter().collect())
    }

    #[tracing::instrument(
        skip(self, exercise),
        fields(db.table = "exercises", db.operation = "insert", exercise.name = %exercise.name)
    )]
    async fn insert(&self, exercise: NewExercise) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO exercises (
                owner_id, name, difficulty, muscle_group, sets, reps, rest_time_secs,
                video_url, category, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(exercise.owner_id)
        .bind(&exercise.name)
        .bind(exercise.difficulty)
        .bind(&exercise.muscle_group)
        .bind(to_db_int(exercise.sets, "sets")?)
        .bind(to_db_int(exercise.reps, "reps")?)
        .bind(to_db_int(exercise.rest_time_secs, "rest_time_secs")?)
        .bind(&exercise.video_url)
        .bind(&exercise.category)
        .bind(&exercise.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}

fn to_db_int(value: u32, field: &str) -> Result<i32, AppError> {
    i32::try_from(value)
        .map_err(|_| AppError::InvalidInput(format!("{} out of range: {}", field, value)))
}
