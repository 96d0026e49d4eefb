//! Filename conventions of the importer.
//!
//! Users name their files `Name_Difficulty_MuscleGroup_SetsxReps.ext`, for
//! example `BenchPress_Intermediate_Chest_3x12.mp4`. The first field doubles
//! as the duplicate-matching key; no stronger identity exists.

use coachdeck_core::constants::SUPPORTED_EXTENSIONS;
use coachdeck_core::models::{Difficulty, ParsedExerciseMetadata};

const FIELD_SEPARATOR: char = '_';

/// Lowercase extension of `filename`, without the dot.
///
/// Hidden-file names such as `.mp4` have no extension.
pub fn file_extension(filename: &str) -> Option<String> {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}

pub fn is_supported_extension(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Filename without a supported extension; other names are returned whole.
fn strip_supported_extension(filename: &str) -> &str {
    if is_supported_extension(filename) {
        filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(filename)
    } else {
        filename
    }
}

/// Name used for duplicate matching: the first `_`-delimited field.
pub fn exercise_name(filename: &str) -> String {
    strip_supported_extension(filename)
        .split(FIELD_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Parse `Name_Difficulty_MuscleGroup_SetsxReps` into exercise metadata.
///
/// Missing or empty fields keep their defaults; short names never fail.
pub fn parse_exercise_metadata(filename: &str) -> ParsedExerciseMetadata {
    let mut fields = strip_supported_extension(filename)
        .split(FIELD_SEPARATOR)
        .map(str::trim);

    let mut metadata = ParsedExerciseMetadata::with_defaults(fields.next().unwrap_or_default());

    if let Some(token) = fields.next().filter(|t| !t.is_empty()) {
        metadata.difficulty = Difficulty::from_token(token);
    }
    if let Some(token) = fields.next().filter(|t| !t.is_empty()) {
        metadata.muscle_group = token.to_string();
    }
    if let Some((sets, reps)) = fields.next().and_then(parse_sets_reps) {
        metadata.sets = sets;
        metadata.reps = reps;
    }

    metadata
}

/// `"4x8"` → `(4, 8)`. Both sides must be positive integers.
fn parse_sets_reps(token: &str) -> Option<(u32, u32)> {
    let (sets, reps) = token.split_once(['x', 'X'])?;
    let sets = sets.trim().parse::<u32>().ok().filter(|n| *n > 0)?;
    let reps = reps.trim().parse::<u32>().ok().filter(|n| *n > 0)?;
    Some((sets, reps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachdeck_core::constants::{DEFAULT_REPS, DEFAULT_SETS};

    const DEFAULT_SETS_REPS: (u32, u32) = (DEFAULT_SETS, DEFAULT_REPS);

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Squat.MP4").as_deref(), Some("mp4"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".mp4"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn supported_extensions() {
        assert!(is_supported_extension("a.mp4"));
        assert!(is_supported_extension("a.WebM"));
        assert!(is_supported_extension("a.MOV"));
        assert!(is_supported_extension("a.gif"));
        assert!(!is_supported_extension("a.avi"));
        assert!(!is_supported_extension("mp4"));
    }

    #[test]
    fn exercise_name_is_first_field() {
        assert_eq!(exercise_name("BenchPress_Intermediate_Chest_3x12.mp4"), "BenchPress");
        assert_eq!(exercise_name("Plank.mp4"), "Plank");
        assert_eq!(exercise_name("Plank.MOV"), "Plank");
        assert_eq!(exercise_name(" Lunge _x.gif"), "Lunge");
    }

    #[test]
    fn exercise_name_keeps_unsupported_extension() {
        assert_eq!(exercise_name("notes.txt"), "notes.txt");
        assert_eq!(exercise_name("Squat_avancado.avi"), "Squat");
    }

    #[test]
    fn bare_name_parses_to_defaults() {
        let parsed = parse_exercise_metadata("Plank.mp4");
        assert_eq!(parsed.name, "Plank");
        assert_eq!(parsed.difficulty, Difficulty::Intermediate);
        assert_eq!(parsed.muscle_group, "geral");
        assert_eq!((parsed.sets, parsed.reps), DEFAULT_SETS_REPS);
        assert_eq!(parsed.rest_time_secs, 60);
    }

    #[test]
    fn full_name_parses_every_field() {
        let parsed = parse_exercise_metadata("Squat_avancado_Legs_4x8.mp4");
        assert_eq!(parsed.name, "Squat");
        assert_eq!(parsed.difficulty, Difficulty::Advanced);
        assert_eq!(parsed.muscle_group, "Legs");
        assert_eq!(parsed.sets, 4);
        assert_eq!(parsed.reps, 8);
        assert_eq!(parsed.rest_time_secs, 60);
    }

    #[test]
    fn partial_names_fall_back_per_field() {
        let parsed = parse_exercise_metadata("Row_iniciante.webm");
        assert_eq!(parsed.difficulty, Difficulty::Beginner);
        assert_eq!(parsed.muscle_group, "geral");

        let parsed = parse_exercise_metadata("Row__Back_5X5.gif");
        assert_eq!(parsed.difficulty, Difficulty::Intermediate);
        assert_eq!(parsed.muscle_group, "Back");
        assert_eq!((parsed.sets, parsed.reps), (5, 5));
    }

    #[test]
    fn malformed_sets_reps_use_defaults() {
        for name in [
            "Curl_facil_Biceps_3x.mp4",
            "Curl_facil_Biceps_x12.mp4",
            "Curl_facil_Biceps_0x12.mp4",
            "Curl_facil_Biceps_tenxten.mp4",
        ] {
            let parsed = parse_exercise_metadata(name);
            assert_eq!((parsed.sets, parsed.reps), DEFAULT_SETS_REPS, "{}", name);
        }
    }

    #[test]
    fn rest_time_is_never_parsed() {
        let parsed = parse_exercise_metadata("Curl_facil_Biceps_3x10_90.mp4");
        assert_eq!(parsed.rest_time_secs, 60);
    }
}
