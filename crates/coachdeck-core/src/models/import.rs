use serde::{Deserialize, Serialize};

/// Media file handed to the import pipeline
///
/// Borrowed by the pipeline for one run. A file that could not be read still
/// enters the pipeline so the analysis can report it, and a file over the
/// size limit enters with its size only.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub filename: String,
    pub content_type: String,
    content: Content,
}

#[derive(Debug, Clone)]
enum Content {
    Loaded(Vec<u8>),
    NotLoaded { size: usize },
    Unreadable(String),
}

impl MediaFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: Content::Loaded(data),
        }
    }

    /// File known only by its size; its bytes were never read.
    pub fn oversize(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        size: usize,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: Content::NotLoaded { size },
        }
    }

    pub fn unreadable(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "application/octet-stream".to_string(),
            content: Content::Unreadable(reason.into()),
        }
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.content {
            Content::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn read_error(&self) -> Option<&str> {
        match &self.content {
            Content::Unreadable(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn size(&self) -> usize {
        match &self.content {
            Content::Loaded(data) => data.len(),
            Content::NotLoaded { size } => *size,
            Content::Unreadable(_) => 0,
        }
    }
}

/// Outcome of analysing one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClassification {
    New,
    Duplicate,
    Invalid,
}

/// Per-file analysis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub filename: String,
    /// First `_`-delimited token of the filename; the duplicate-matching key.
    pub exercise_name: String,
    pub is_valid: bool,
    pub is_duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FileAnalysis {
    pub fn new_exercise(filename: impl Into<String>, exercise_name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            exercise_name: exercise_name.into(),
            is_valid: true,
            is_duplicate: false,
            reason: None,
        }
    }

    pub fn invalid(
        filename: impl Into<String>,
        exercise_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            exercise_name: exercise_name.into(),
            is_valid: false,
            is_duplicate: false,
            reason: Some(reason.into()),
        }
    }

    pub fn duplicate(
        filename: impl Into<String>,
        exercise_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            exercise_name: exercise_name.into(),
            is_valid: true,
            is_duplicate: true,
            reason: Some(reason.into()),
        }
    }

    /// Invalid wins over duplicate.
    pub fn classification(&self) -> FileClassification {
        if !self.is_valid {
            FileClassification::Invalid
        } else if self.is_duplicate {
            FileClassification::Duplicate
        } else {
            FileClassification::New
        }
    }
}

/// Aggregate analysis of one import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAnalysis {
    pub total: usize,
    pub new_exercises: usize,
    pub duplicates: usize,
    pub invalid: usize,
    pub files: Vec<FileAnalysis>,
}

impl ImportAnalysis {
    /// Build the aggregate by tallying each file's classification once.
    pub fn from_files(files: Vec<FileAnalysis>) -> Self {
        let (mut new_exercises, mut duplicates, mut invalid) = (0, 0, 0);
        for file in &files {
            match file.classification() {
                FileClassification::New => new_exercises += 1,
                FileClassification::Duplicate => duplicates += 1,
                FileClassification::Invalid => invalid += 1,
            }
        }

        Self {
            total: files.len(),
            new_exercises,
            duplicates,
            invalid,
            files,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.new_exercises + self.duplicates + self.invalid == self.total
            && self.total == self.files.len()
    }

    pub fn has_importable_files(&self) -> bool {
        self.new_exercises > 0
    }

    pub fn new_files(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.with_classification(FileClassification::New)
    }

    pub fn duplicate_files(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.with_classification(FileClassification::Duplicate)
    }

    pub fn invalid_files(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.with_classification(FileClassification::Invalid)
    }

    fn with_classification(
        &self,
        classification: FileClassification,
    ) -> impl Iterator<Item = &FileAnalysis> {
        self.files
            .iter()
            .filter(move |f| f.classification() == classification)
    }
}

/// Final status of one file in an import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Failed,
    Duplicate,
    Skipped,
}

/// Per-file entry of the import report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub filename: String,
    pub exercise_name: String,
    pub status: ImportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResult {
    pub fn success(filename: impl Into<String>, exercise_name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            exercise_name: exercise_name.into(),
            status: ImportStatus::Success,
            error: None,
        }
    }

    pub fn failed(
        filename: impl Into<String>,
        exercise_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            exercise_name: exercise_name.into(),
            status: ImportStatus::Failed,
            error: Some(error.into()),
        }
    }

    /// Result recorded without any upload attempt.
    ///
    /// Duplicates keep status `Duplicate`; invalid files become `Skipped`.
    pub fn pre_classified(analysis: &FileAnalysis) -> Option<Self> {
        let status = match analysis.classification() {
            FileClassification::Duplicate => ImportStatus::Duplicate,
            FileClassification::Invalid => ImportStatus::Skipped,
            FileClassification::New => return None,
        };

        Some(Self {
            filename: analysis.filename.clone(),
            exercise_name: analysis.exercise_name.clone(),
            status,
            error: analysis.reason.clone(),
        })
    }
}

/// Running totals reported after each processed file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Every file of the run, whatever its classification.
    pub total: usize,
    /// Files classified `new`, the ones actually uploaded.
    pub to_process: usize,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
}

impl ImportProgress {
    pub fn is_complete(&self) -> bool {
        self.processed == self.to_process
    }

    /// Share of `new` files already attempted, in percent.
    pub fn percent(&self) -> u8 {
        if self.to_process == 0 {
            return 100;
        }
        ((self.processed * 100) / self.to_process) as u8
    }
}
