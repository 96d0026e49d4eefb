//! Shared key generation for storage backends.
//!
//! Key format: `{prefix}/{owner_id}/{timestamp_ms}_{upload_id}_{sanitized_filename}`.

use uuid::Uuid;

const MAX_FILENAME_LEN: usize = 200;
const MAX_EXTENSION_LEN: usize = 16;

/// Replace every character that is not ASCII alphanumeric, `.` or `-` with `_`.
///
/// Path separators and `..` sequences cannot survive: `/` and `\` become `_`
/// and a leading run of dots is collapsed. Long names lose the end of their
/// stem, never the extension.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = truncate_keeping_extension(filename)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_start_matches('.');
    let without_traversal = trimmed.replace("..", "_");
    if without_traversal.is_empty() {
        "file".to_string()
    } else {
        without_traversal
    }
}

fn truncate_keeping_extension(filename: &str) -> String {
    if filename.chars().count() <= MAX_FILENAME_LEN {
        return filename.to_string();
    }

    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.chars().count() < MAX_EXTENSION_LEN => {
            let keep = MAX_FILENAME_LEN - ext.chars().count() - 1;
            let stem: String = stem.chars().take(keep).collect();
            format!("{}.{}", stem, ext)
        }
        _ => filename.chars().take(MAX_FILENAME_LEN).collect(),
    }
}

/// Generate the storage key for one imported file.
///
/// Two files whose names sanitize to the same string may upload within the
/// same millisecond; `upload_id` keeps their keys apart. The owner segment
/// scopes every key to the caller.
pub fn generate_import_key(
    prefix: &str,
    owner_id: Uuid,
    timestamp_ms: i64,
    upload_id: Uuid,
    filename: &str,
) -> String {
    format!(
        "{}/{}/{}_{}_{}",
        prefix.trim_matches('/'),
        owner_id,
        timestamp_ms,
        upload_id.simple(),
        sanitize_filename(filename)
    )
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> bool {
    !storage_key.is_empty() && !storage_key.contains("..") && !storage_key.starts_with('/')
}
