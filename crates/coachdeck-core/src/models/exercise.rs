use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use crate::constants::{DEFAULT_MUSCLE_GROUP, DEFAULT_REPS, DEFAULT_REST_TIME_SECS, DEFAULT_SETS};

/// Normalized three-level difficulty of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "exercise_difficulty", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Map a Portuguese or English difficulty word to its level.
    ///
    /// Matching ignores case and accents. Unknown words map to `Intermediate`.
    pub fn from_token(token: &str) -> Self {
        match fold_accents(token.trim()).as_str() {
            "iniciante" | "beginner" | "basico" | "facil" | "easy" => Difficulty::Beginner,
            "avancado" | "advanced" | "dificil" | "hard" => Difficulty::Advanced,
            _ => Difficulty::Intermediate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Lowercase and strip the diacritics that occur in Portuguese words.
fn fold_accents(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Structured metadata derived from an import filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedExerciseMetadata {
    pub name: String,
    pub difficulty: Difficulty,
    pub muscle_group: String,
    pub sets: u32,
    pub reps: u32,
    pub rest_time_secs: u32,
}

impl ParsedExerciseMetadata {
    /// Metadata for a bare name, every other field at its default.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            difficulty: Difficulty::default(),
            muscle_group: DEFAULT_MUSCLE_GROUP.to_string(),
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS,
            rest_time_secs: DEFAULT_REST_TIME_SECS,
        }
    }
}

/// Catalog record to be appended by the importer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExercise {
    pub owner_id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub muscle_group: String,
    pub sets: u32,
    pub reps: u32,
    pub rest_time_secs: u32,
    pub video_url: String,
    pub category: String,
    pub description: String,
}

impl NewExercise {
    pub fn from_metadata(
        owner_id: Uuid,
        metadata: ParsedExerciseMetadata,
        video_url: String,
        category: String,
        original_filename: &str,
    ) -> Self {
        Self {
            owner_id,
            name: metadata.name,
            difficulty: metadata.difficulty,
            muscle_group: metadata.muscle_group,
            sets: metadata.sets,
            reps: metadata.reps,
            rest_time_secs: metadata.rest_time_secs,
            video_url,
            category,
            description: format!("Imported from {}", original_filename),
        }
    }
}

/// Exercise as stored in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Exercise {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub difficulty: Difficulty,
    pub muscle_group: String,
    pub sets: i32,
    pub reps: i32,
    pub rest_time_secs: i32,
    pub video_url: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_vocabulary() {
        assert_eq!(Difficulty::from_token("iniciante"), Difficulty::Beginner);
        assert_eq!(Difficulty::from_token("Beginner"), Difficulty::Beginner);
        assert_eq!(Difficulty::from_token("FÁCIL"), Difficulty::Beginner);
        assert_eq!(Difficulty::from_token("Intermediário"), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_token("avancado"), Difficulty::Advanced);
        assert_eq!(Difficulty::from_token("Avançado"), Difficulty::Advanced);
        assert_eq!(Difficulty::from_token("HARD"), Difficulty::Advanced);
    }

    #[test]
    fn unknown_difficulty_defaults_to_intermediate() {
        assert_eq!(Difficulty::from_token("extreme"), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_token(""), Difficulty::Intermediate);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Advanced).unwrap();
        assert_eq!(json, "\"advanced\"");
    }

    #[test]
    fn new_exercise_description_references_filename() {
        let owner = Uuid::new_v4();
        let record = NewExercise::from_metadata(
            owner,
            ParsedExerciseMetadata::with_defaults("Plank"),
            "https://cdn.example.com/plank.mp4".to_string(),
            "imported".to_string(),
            "Plank.mp4",
        );
        assert_eq!(record.description, "Imported from Plank.mp4");
        assert_eq!(record.owner_id, owner);
        assert_eq!(record.rest_time_secs, 60);
    }
}
