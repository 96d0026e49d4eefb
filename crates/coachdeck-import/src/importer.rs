//! Sequential batch importer.
//!
//! Each `new` file goes through `Pending → Uploading → Persisting → Done`.
//! The runner drives one [`ImportTask`] to `Done` before starting the next,
//! so results and progress callbacks follow the analysis order. A failed
//! file never stops the batch and nothing is rolled back.

use std::sync::Arc;

use chrono::Utc;
use coachdeck_core::models::{
    FileAnalysis, FileClassification, ImportAnalysis, ImportProgress, ImportResult, ImportStatus,
    MediaFile, NewExercise,
};
use coachdeck_core::{AppError, ImportConfig};
use coachdeck_db::ExerciseCatalog;
use coachdeck_storage::{generate_import_key, Storage};
use uuid::Uuid;

use crate::filename::parse_exercise_metadata;

/// Receives running totals after each processed file
pub trait ProgressSink {
    fn on_progress(&mut self, progress: &ImportProgress);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ImportProgress),
{
    fn on_progress(&mut self, progress: &ImportProgress) {
        self(progress)
    }
}

/// Lifecycle of one file inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStage {
    Pending,
    Uploading,
    Persisting { video_url: String },
    /// Terminal: `Success` or `Failed`.
    Done(ImportStatus),
}

/// One `new` file being imported
#[derive(Debug)]
pub struct ImportTask<'a> {
    owner_id: Uuid,
    file: &'a MediaFile,
    exercise_name: String,
    stage: ImportStage,
    error: Option<String>,
}

impl<'a> ImportTask<'a> {
    pub fn new(owner_id: Uuid, file: &'a MediaFile, analysis: &FileAnalysis) -> Self {
        Self {
            owner_id,
            file,
            exercise_name: analysis.exercise_name.clone(),
            stage: ImportStage::Pending,
            error: None,
        }
    }

    pub fn stage(&self) -> &ImportStage {
        &self.stage
    }

    pub fn is_done(&self) -> bool {
        matches!(self.stage, ImportStage::Done(_))
    }

    /// Perform exactly one transition. Returns `false` once the task is done.
    pub async fn step(&mut self, importer: &BatchImporter) -> bool {
        let next = match self.stage.clone() {
            ImportStage::Pending => ImportStage::Uploading,
            ImportStage::Uploading => match importer.upload(self.owner_id, self.file).await {
                Ok(video_url) => ImportStage::Persisting { video_url },
                Err(e) => self.fail(e),
            },
            ImportStage::Persisting { video_url } => {
                match importer
                    .persist(self.owner_id, &self.file.filename, video_url)
                    .await
                {
                    Ok(id) => {
                        tracing::debug!(exercise_id = %id, filename = %self.file.filename, "Catalog record created");
                        ImportStage::Done(ImportStatus::Success)
                    }
                    Err(e) => self.fail(e),
                }
            }
            ImportStage::Done(_) => return false,
        };

        self.stage = next;
        true
    }

    fn fail(&mut self, error: AppError) -> ImportStage {
        self.error = Some(error.to_string());
        ImportStage::Done(ImportStatus::Failed)
    }

    /// Final result, available once the task reached `Done`.
    pub fn into_result(self) -> Option<ImportResult> {
        match self.stage {
            ImportStage::Done(ImportStatus::Success) => Some(ImportResult::success(
                &self.file.filename,
                self.exercise_name,
            )),
            ImportStage::Done(_) => Some(ImportResult::failed(
                &self.file.filename,
                self.exercise_name,
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            _ => None,
        }
    }
}

/// Uploads analysed files and appends their catalog records
pub struct BatchImporter {
    storage: Arc<dyn Storage>,
    catalog: Arc<dyn ExerciseCatalog>,
    config: ImportConfig,
}

impl BatchImporter {
    pub fn new(
        storage: Arc<dyn Storage>,
        catalog: Arc<dyn ExerciseCatalog>,
        config: ImportConfig,
    ) -> Self {
        Self {
            storage,
            catalog,
            config,
        }
    }

    /// Import every `new` file of `analysis`, one at a time.
    ///
    /// `files` must be the list the analysis was computed from. Duplicate and
    /// invalid files are recorded up front without any upload; the returned
    /// list holds those entries first, then one entry per attempted file.
    #[tracing::instrument(skip_all, fields(owner_id = %owner_id, total = analysis.total, to_process = analysis.new_exercises))]
    pub async fn import_batch<P: ProgressSink + ?Sized>(
        &self,
        owner_id: Uuid,
        files: &[MediaFile],
        analysis: &ImportAnalysis,
        progress: &mut P,
    ) -> Result<Vec<ImportResult>, AppError> {
        ensure_same_files(files, analysis)?;

        let mut results: Vec<ImportResult> = analysis
            .files
            .iter()
            .filter_map(ImportResult::pre_classified)
            .collect();

        let mut state = ImportProgress {
            total: analysis.total,
            to_process: analysis.new_exercises,
            duplicates: analysis.duplicates,
            skipped: analysis.invalid,
            ..ImportProgress::default()
        };

        let pending: Vec<(&MediaFile, &FileAnalysis)> = files
            .iter()
            .zip(&analysis.files)
            .filter(|(_, a)| a.classification() == FileClassification::New)
            .collect();

        tracing::info!("Starting batch import");

        for (index, (file, file_analysis)) in pending.into_iter().enumerate() {
            if index > 0 && !self.config.throttle.is_zero() {
                tokio::time::sleep(self.config.throttle).await;
            }

            let mut task = ImportTask::new(owner_id, file, file_analysis);
            while task.step(self).await {}

            let result = task.into_result().ok_or_else(|| {
                AppError::Internal(format!("import of {} did not finish", file.filename))
            })?;

            match result.status {
                ImportStatus::Success => {
                    state.successful += 1;
                    tracing::info!(filename = %result.filename, "Imported exercise");
                }
                _ => {
                    state.failed += 1;
                    tracing::warn!(
                        filename = %result.filename,
                        error = result.error.as_deref().unwrap_or_default(),
                        "Failed to import exercise"
                    );
                }
            }

            state.processed += 1;
            state.current_file = Some(result.filename.clone());
            results.push(result);
            progress.on_progress(&state);
        }

        tracing::info!(
            successful = state.successful,
            failed = state.failed,
            duplicates = state.duplicates,
            skipped = state.skipped,
            "Batch import finished"
        );

        Ok(results)
    }

    async fn upload(&self, owner_id: Uuid, file: &MediaFile) -> Result<String, AppError> {
        let data = file
            .data()
            .ok_or_else(|| AppError::InvalidInput(format!("{} could not be read", file.filename)))?
            .to_vec();

        let key = generate_import_key(
            &self.config.key_prefix,
            owner_id,
            Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            &file.filename,
        );

        let url = self
            .storage
            .upload_with_key(&key, data, &file.content_type)
            .await?;
        Ok(url)
    }

    async fn persist(
        &self,
        owner_id: Uuid,
        filename: &str,
        video_url: String,
    ) -> Result<Uuid, AppError> {
        let mut metadata = parse_exercise_metadata(filename);
        metadata.rest_time_secs = self.config.default_rest_time_secs;

        let record = NewExercise::from_metadata(
            owner_id,
            metadata,
            video_url,
            self.config.category.clone(),
            filename,
        );
        self.catalog.insert(record).await
    }
}

fn ensure_same_files(files: &[MediaFile], analysis: &ImportAnalysis) -> Result<(), AppError> {
    if files.len() != analysis.files.len() {
        return Err(AppError::InvalidInput(format!(
            "analysis covers {} files but {} were supplied",
            analysis.files.len(),
            files.len()
        )));
    }

    if let Some((file, analysed)) = files
        .iter()
        .zip(&analysis.files)
        .find(|(f, a)| f.filename != a.filename)
    {
        return Err(AppError::InvalidInput(format!(
            "file {} does not match analysed file {}",
            file.filename, analysed.filename
        )));
    }

    Ok(())
}
