//! Import summary and downloadable report.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use coachdeck_core::models::{FileClassification, ImportAnalysis, ImportResult, ImportStatus};
use coachdeck_core::AppError;
use serde::{Deserialize, Serialize};

/// Counts of a finished run, by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn from_results(results: &[ImportResult]) -> Self {
        results.iter().fold(
            ImportSummary {
                total: results.len(),
                ..ImportSummary::default()
            },
            |mut summary, result| {
                match result.status {
                    ImportStatus::Success => summary.successful += 1,
                    ImportStatus::Failed => summary.failed += 1,
                    ImportStatus::Duplicate => summary.duplicates += 1,
                    ImportStatus::Skipped => summary.skipped += 1,
                }
                summary
            },
        )
    }

    pub fn is_consistent(&self) -> bool {
        self.successful + self.failed + self.duplicates + self.skipped == self.total
    }
}

/// Machine-readable report of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ImportSummary,
    pub results: Vec<ImportResult>,
}

impl ImportReport {
    pub fn new(results: Vec<ImportResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: ImportSummary::from_results(&results),
            results,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `import-report-YYYYMMDD-HHMMSS.json`, from the generation time.
    pub fn default_file_name(&self) -> String {
        format!(
            "import-report-{}.json",
            self.generated_at.format("%Y%m%d-%H%M%S")
        )
    }

    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_json_pretty()?).await?;
        tracing::info!(path = %path.display(), "Import report written");
        Ok(())
    }
}

/// Human-readable summary shown after a run
pub fn render_summary(summary: &ImportSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Import finished: {} file(s)", summary.total);
    let _ = writeln!(out, "  imported:   {}", summary.successful);
    let _ = writeln!(out, "  failed:     {}", summary.failed);
    let _ = writeln!(out, "  duplicates: {}", summary.duplicates);
    let _ = write!(out, "  skipped:    {}", summary.skipped);
    out
}

/// Review of an analysis, shown before the operator confirms the import
pub fn render_analysis(analysis: &ImportAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} file(s): {} new, {} duplicate, {} invalid",
        analysis.total, analysis.new_exercises, analysis.duplicates, analysis.invalid
    );

    for file in &analysis.files {
        let label = match file.classification() {
            FileClassification::New => "new",
            FileClassification::Duplicate => "duplicate",
            FileClassification::Invalid => "invalid",
        };
        match &file.reason {
            Some(reason) => {
                let _ = writeln!(out, "  [{:<9}] {} ({})", label, file.filename, reason);
            }
            None => {
                let _ = writeln!(out, "  [{:<9}] {}", label, file.filename);
            }
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachdeck_core::models::FileAnalysis;
    use tempfile::tempdir;

    fn results() -> Vec<ImportResult> {
        vec![
            ImportResult {
                filename: "notes.txt".into(),
                exercise_name: "notes.txt".into(),
                status: ImportStatus::Skipped,
                error: Some("unsupported format".into()),
            },
            ImportResult::success("Squat.mp4", "Squat"),
            ImportResult::failed("Row.mp4", "Row", "Upload failed: timeout"),
        ]
    }

    #[test]
    fn summary_counts_each_status() {
        let summary = ImportSummary::from_results(&results());
        assert_eq!(
            summary,
            ImportSummary {
                total: 3,
                successful: 1,
                failed: 1,
                duplicates: 0,
                skipped: 1,
            }
        );
        assert!(summary.is_consistent());
    }

    #[test]
    fn report_serializes_results_and_counters() {
        let report = ImportReport::new(results());
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["summary"]["successful"], 1);
        assert_eq!(value["results"][0]["status"], "skipped");
        assert_eq!(value["results"][2]["error"], "Upload failed: timeout");
        assert!(value["results"][1].get("error").is_none());
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn default_file_name_uses_timestamp() {
        let report = ImportReport::new(Vec::new());
        let name = report.default_file_name();
        assert!(name.starts_with("import-report-"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "import-report-20250101-120000.json".len());
    }

    #[tokio::test]
    async fn write_to_persists_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = ImportReport::new(results());

        report.write_to(&path).await.unwrap();

        let parsed: ImportReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.summary, report.summary);
        assert_eq!(parsed.results, report.results);
    }

    #[test]
    fn renders_summary_lines() {
        let text = render_summary(&ImportSummary::from_results(&results()));
        assert!(text.starts_with("Import finished: 3 file(s)"));
        assert!(text.contains("imported:   1"));
        assert!(text.ends_with("skipped:    1"));
    }

    #[test]
    fn renders_analysis_with_reasons() {
        let analysis = ImportAnalysis::from_files(vec![
            FileAnalysis::new_exercise("Squat.mp4", "Squat"),
            FileAnalysis::invalid("notes.txt", "notes.txt", "unsupported format"),
        ]);
        let text = render_analysis(&analysis);
        assert!(text.starts_with("2 file(s): 1 new, 0 duplicate, 1 invalid"));
        assert!(text.contains("[new      ] Squat.mp4"));
        assert!(text.contains("[invalid  ] notes.txt (unsupported format)"));
    }
}
