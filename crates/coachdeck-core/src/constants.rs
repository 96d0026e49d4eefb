//! Constants shared across the import pipeline.

/// Extensions accepted by the importer (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mov", "gif"];

/// Muscle group used when the filename does not name one.
pub const DEFAULT_MUSCLE_GROUP: &str = "geral";

pub const DEFAULT_SETS: u32 = 3;
pub const DEFAULT_REPS: u32 = 12;

/// Rest time is never encoded in filenames.
pub const DEFAULT_REST_TIME_SECS: u32 = 60;

/// Category tag stamped on every imported catalog record.
pub const IMPORTED_CATEGORY: &str = "imported";

/// Root of the storage keys written by the importer.
pub const DEFAULT_KEY_PREFIX: &str = "exercise-videos";

pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 100;
pub const DEFAULT_THROTTLE_MS: u64 = 100;

/// MIME type for a supported extension, `application/octet-stream` otherwise.
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
