//! Duplicate and validity analysis of a file set.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use coachdeck_core::models::{FileAnalysis, ImportAnalysis, MediaFile};
use coachdeck_core::{AppError, ImportConfig};
use coachdeck_db::ExerciseCatalog;
use uuid::Uuid;

use crate::filename::{exercise_name, is_supported_extension};

/// Classifies files against the catalog before anything is uploaded
pub struct ImportAnalyzer {
    catalog: Arc<dyn ExerciseCatalog>,
    config: ImportConfig,
}

impl ImportAnalyzer {
    pub fn new(catalog: Arc<dyn ExerciseCatalog>, config: ImportConfig) -> Self {
        Self { catalog, config }
    }

    /// Analyse `files` for `owner_id`.
    ///
    /// Reads the catalog names once. If that read fails the whole analysis
    /// fails; no partial result is returned.
    #[tracing::instrument(skip(self, files), fields(owner_id = %owner_id, files = files.len()))]
    pub async fn analyze(
        &self,
        owner_id: Uuid,
        files: &[MediaFile],
    ) -> Result<ImportAnalysis, AppError> {
        let existing = self.catalog.list_names(owner_id).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read catalog names");
            match e {
                AppError::Catalog(msg) => AppError::Catalog(msg),
                other => AppError::Catalog(other.to_string()),
            }
        })?;

        let analysis = classify(files, &existing, &self.config);

        tracing::info!(
            total = analysis.total,
            new_exercises = analysis.new_exercises,
            duplicates = analysis.duplicates,
            invalid = analysis.invalid,
            "Import analysis complete"
        );

        Ok(analysis)
    }
}

/// Classify every file; pure and deterministic.
///
/// Validity is checked first and short-circuits the duplicate checks. A valid
/// file is then a catalog duplicate, an in-batch duplicate of an earlier new
/// file, or new. Name matching is case-insensitive.
pub fn classify(
    files: &[MediaFile],
    existing_names: &HashSet<String>,
    config: &ImportConfig,
) -> ImportAnalysis {
    let catalog_keys: HashSet<String> = existing_names.iter().map(|n| match_key(n)).collect();
    // lowercase name -> filename of the first new file carrying it
    let mut seen: HashMap<String, &str> = HashMap::new();

    let analyses = files
        .iter()
        .map(|file| {
            let name = exercise_name(&file.filename);

            if let Some(reason) = invalid_reason(file, &name, config) {
                return FileAnalysis::invalid(&file.filename, name, reason);
            }

            let key = match_key(&name);
            if catalog_keys.contains(&key) {
                return FileAnalysis::duplicate(&file.filename, name, "already exists in catalog");
            }
            if let Some(first) = seen.get(&key) {
                let reason = format!("duplicate of {} in this batch", first);
                return FileAnalysis::duplicate(&file.filename, name, reason);
            }

            seen.insert(key, &file.filename);
            FileAnalysis::new_exercise(&file.filename, name)
        })
        .collect();

    ImportAnalysis::from_files(analyses)
}

fn match_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First failed validity rule, if any.
fn invalid_reason(file: &MediaFile, name: &str, config: &ImportConfig) -> Option<String> {
    if file.read_error().is_some() {
        return Some("file could not be read".to_string());
    }
    if !is_supported_extension(&file.filename) {
        return Some("unsupported format".to_string());
    }
    if file.size() == 0 {
        return Some("file is empty".to_string());
    }
    if file.size() > config.max_file_size_bytes {
        return Some(format!(
            "file exceeds maximum size of {} MB",
            config.max_file_size_mb()
        ));
    }
    if name.is_empty() {
        return Some("missing exercise name".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{video, MemoryCatalog};
    use coachdeck_core::models::FileClassification;

    fn names(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config() -> ImportConfig {
        ImportConfig::default()
    }

    #[test]
    fn classifies_new_duplicate_and_invalid() {
        let files = vec![
            video("Squat_avancado_Legs_4x8.mp4"),
            video("Plank.mp4"),
            video("notes.txt"),
        ];
        let analysis = classify(&files, &names(&["plank"]), &config());

        let classes: Vec<_> = analysis.files.iter().map(|f| f.classification()).collect();
        assert_eq!(
            classes,
            vec![
                FileClassification::New,
                FileClassification::Duplicate,
                FileClassification::Invalid
            ]
        );
        assert_eq!(analysis.files[1].reason.as_deref(), Some("already exists in catalog"));
        assert_eq!(analysis.files[2].reason.as_deref(), Some("unsupported format"));
        assert!(analysis.is_consistent());
    }

    #[test]
    fn invalid_wins_over_duplicate() {
        let files = vec![video("Squat.mp4"), video("Squat_avancado.avi")];
        let analysis = classify(&files, &names(&["SQUAT"]), &config());

        assert_eq!(analysis.files[1].classification(), FileClassification::Invalid);
        assert!(!analysis.files[1].is_duplicate);
        assert_eq!(analysis.duplicates, 1);
        assert_eq!(analysis.invalid, 1);
    }

    #[test]
    fn first_occurrence_in_batch_wins_case_insensitively() {
        let files = vec![
            video("Squat_iniciante.mp4"),
            video("squat_avancado.webm"),
            video("SQUAT.gif"),
        ];
        let analysis = classify(&files, &HashSet::new(), &config());

        assert_eq!(analysis.new_exercises, 1);
        assert_eq!(analysis.duplicates, 2);
        assert_eq!(analysis.files[0].classification(), FileClassification::New);
        assert_eq!(
            analysis.files[1].reason.as_deref(),
            Some("duplicate of Squat_iniciante.mp4 in this batch")
        );
    }

    #[test]
    fn invalid_file_does_not_claim_its_name() {
        let files = vec![video("Lunge.avi"), video("Lunge.mp4")];
        let analysis = classify(&files, &HashSet::new(), &config());

        assert_eq!(analysis.files[0].classification(), FileClassification::Invalid);
        assert_eq!(analysis.files[1].classification(), FileClassification::New);
    }

    #[test]
    fn size_and_readability_rules() {
        let config = ImportConfig {
            max_file_size_bytes: 8,
            ..ImportConfig::default()
        };
        let files = vec![
            MediaFile::unreadable("Broken.mp4", "permission denied"),
            MediaFile::new("Empty.mp4", "video/mp4", Vec::new()),
            MediaFile::new("Huge.mp4", "video/mp4", vec![0; 9]),
            MediaFile::new("_Nameless.mp4", "video/mp4", vec![0; 4]),
            MediaFile::new("Fits.mp4", "video/mp4", vec![0; 8]),
        ];
        let analysis = classify(&files, &HashSet::new(), &config);

        let reasons: Vec<_> = analysis.files.iter().map(|f| f.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                Some("file could not be read".to_string()),
                Some("file is empty".to_string()),
                Some("file exceeds maximum size of 0 MB".to_string()),
                Some("missing exercise name".to_string()),
                None,
            ]
        );
        assert_eq!(analysis.invalid, 4);
        assert_eq!(analysis.new_exercises, 1);
    }

    #[test]
    fn classification_is_deterministic() {
        let files = vec![
            video("Row.mp4"),
            video("row_facil.mov"),
            video("Curl.gif"),
            video("x.png"),
        ];
        let existing = names(&["curl"]);
        assert_eq!(
            classify(&files, &existing, &config()),
            classify(&files, &existing, &config())
        );
    }

    #[tokio::test]
    async fn analyze_reads_catalog_once() {
        let owner = Uuid::new_v4();
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.seed(owner, ["Deadlift"]);
        let analyzer = ImportAnalyzer::new(catalog.clone(), config());

        let files = vec![video("deadlift.mp4"), video("Press.mp4")];
        let analysis = analyzer.analyze(owner, &files).await.unwrap();

        assert_eq!(analysis.duplicates, 1);
        assert_eq!(analysis.new_exercises, 1);
        assert_eq!(catalog.list_calls(), 1);
    }

    #[tokio::test]
    async fn analyze_fails_when_catalog_is_unreadable() {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.fail_reads("connection refused");
        let analyzer = ImportAnalyzer::new(catalog, config());

        let result = analyzer.analyze(Uuid::new_v4(), &[video("Squat.mp4")]).await;
        assert!(matches!(result, Err(AppError::Catalog(msg)) if msg.contains("connection refused")));
    }
}
