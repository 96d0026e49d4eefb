//! Gathers media files from the filesystem.

use std::path::{Path, PathBuf};

use coachdeck_core::constants::content_type_for_extension;
use coachdeck_core::models::MediaFile;
use tokio::fs;

use crate::filename::file_extension;

/// Read every path into a [`MediaFile`].
///
/// A directory contributes its direct regular-file children sorted by name.
/// Unreadable entries become unreadable `MediaFile`s so the analysis can
/// report them; this function never fails. Files larger than
/// `max_file_size_bytes` are not read, only their size is kept.
pub async fn collect_paths<P: AsRef<Path>>(
    paths: &[P],
    max_file_size_bytes: usize,
) -> Vec<MediaFile> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => match list_dir(path).await {
                Ok(children) => {
                    for child in children {
                        files.push(read_file(&child, max_file_size_bytes).await);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to list directory");
                    files.push(MediaFile::unreadable(display_name(path), e.to_string()));
                }
            },
            _ => files.push(read_file(path, max_file_size_bytes).await),
        }
    }

    tracing::debug!(count = files.len(), "Collected media files");
    files
}

async fn list_dir(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut children = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            children.push(entry.path());
        }
    }

    children.sort();
    Ok(children)
}

async fn read_file(path: &Path, max_file_size_bytes: usize) -> MediaFile {
    let filename = display_name(path);
    let extension = file_extension(&filename).unwrap_or_default();
    let content_type = content_type_for_extension(&extension);

    let size = match fs::metadata(path).await {
        Ok(meta) => usize::try_from(meta.len()).unwrap_or(usize::MAX),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to stat media file");
            return MediaFile::unreadable(filename, e.to_string());
        }
    };

    if size > max_file_size_bytes {
        tracing::debug!(path = %path.display(), size_bytes = size, "Skipping read of oversize file");
        return MediaFile::oversize(filename, content_type, size);
    }

    match fs::read(path).await {
        Ok(data) => MediaFile::new(filename, content_type, data),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read media file");
            MediaFile::unreadable(filename, e.to_string())
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
