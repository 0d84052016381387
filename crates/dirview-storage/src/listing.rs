//! Directory listing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use dirview_core::error::{AppError, ErrorKind};
use dirview_core::result::AppResult;

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Regular file, or anything that is not a directory.
    File,
    /// Directory.
    Directory,
}

/// A file or directory as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Final path component.
    pub name: String,
    /// File or directory.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Size in bytes. Always 0 for directories.
    pub size: u64,
    /// Immediate children, only for the directory that was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<FileInfo>>,
}

/// Reads `path` and, if it is a directory, its immediate children sorted
/// by name. Children whose metadata cannot be read are skipped.
///
/// `path` must already be resolved inside the root.
pub async fn read_listing(path: &Path) -> AppResult<FileInfo> {
    let metadata = fs::metadata(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found("File or directory does not exist")
        } else {
            AppError::with_source(ErrorKind::Storage, "Failed to read path metadata", e)
        }
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "/".to_string());

    if !metadata.is_dir() {
        return Ok(FileInfo {
            name,
            entry_type: EntryType::File,
            size: metadata.len(),
            contents: None,
        });
    }

    let mut dir = fs::read_dir(path).await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to list directory", e)
    })?;

    let mut contents = Vec::new();
    while let Some(entry) = dir.next_entry().await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
    })? {
        let entry_meta = match entry.metadata().await {
            Ok(m) => m,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        let (entry_type, size) = if entry_meta.is_dir() {
            (EntryType::Directory, 0)
        } else {
            (EntryType::File, entry_meta.len())
        };

        contents.push(FileInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            entry_type,
            size,
            contents: None,
        });
    }
    contents.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(FileInfo {
        name,
        entry_type: EntryType::Directory,
        size: 0,
        contents: Some(contents),
    })
}
