// src/sources/mod.rs
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::batch::{DocumentFailure, SourceDocument};
use crate::utils::error::{AppError, ExtractError};

pub const DEFAULT_PATTERN: &str = "*.json";

/// Lists the files directly inside `dir` whose name matches `pattern`, sorted by path.
pub fn scan_folder<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>, AppError> {
    let dir = dir.as_ref();
    let matcher = Pattern::new(pattern)
        .map_err(|e| AppError::Config(format!("Invalid file pattern '{}': {}", pattern, e)))?;

    if !dir.is_dir() {
        return Err(AppError::Config(format!("Input directory not found: {}", dir.display())));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|name| matcher.matches(name))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    tracing::info!("Found {} files matching '{}' in {}", files.len(), pattern, dir.display());
    Ok(files)
}

/// Name used in row order and error messages: the file name when there is one.
pub fn identifier_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads each path into memory. Unreadable files become failures; the rest load.
pub async fn load_documents(paths: &[PathBuf]) -> (Vec<SourceDocument>, Vec<DocumentFailure>) {
    let mut documents = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for path in paths {
        let identifier = identifier_for(path);
        match tokio::fs::read(path).await {
            Ok(content) => {
                tracing::debug!("Loaded {} ({} bytes)", path.display(), content.len());
                documents.push(SourceDocument::new(identifier, content));
            }
            Err(e) => {
                tracing::error!("Failed to read {}: {}", path.display(), e);
                failures.push(DocumentFailure::new(identifier, ExtractError::Read(e)));
            }
        }
    }

    (documents, failures)
}
