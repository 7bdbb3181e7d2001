//! Admission of curl command files.
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AppResult;

/// Largest curl file accepted for import.
pub const DEFAULT_MAX_IMPORT_BYTES: u64 = 128 * 1024;

const DEFAULT_UNSUPPORTED_EXTENSIONS: [&str; 16] = [
    "7z", "bin", "class", "dll", "exe", "gif", "gz", "jar", "jpeg", "jpg", "pdf", "png", "rar",
    "so", "tar", "zip",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportPolicy {
    pub max_bytes: u64,
    /// Lowercase extensions without the leading dot.
    pub unsupported_extensions: Vec<String>,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMPORT_BYTES,
            unsupported_extensions: DEFAULT_UNSUPPORTED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
        }
    }
}

impl ImportPolicy {
    fn rejects_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| {
                self.unsupported_extensions
                    .iter()
                    .any(|blocked| blocked.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
    }
}

/// Reads `path` as curl text when the policy admits it.
///
/// Oversized files and blocked extensions are skipped with a warning and
/// yield `Ok(None)`.
///
/// # Errors
///
/// Returns an error when the file metadata or contents cannot be read.
pub fn read_curl_file(path: &Path, policy: &ImportPolicy) -> AppResult<Option<String>> {
    let size = std::fs::metadata(path)?.len();
    if size > policy.max_bytes {
        warn!(
            "Skipping {}: {} bytes exceeds the {} byte import limit",
            path.display(),
            size,
            policy.max_bytes
        );
        return Ok(None);
    }
    if policy.rejects_extension(path) {
        warn!("Skipping {}: unsupported file extension", path.display());
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    debug!("Imported {} bytes of curl text from {}", text.len(), path.display());
    Ok(Some(text))
}
