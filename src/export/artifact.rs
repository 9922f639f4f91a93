// All-or-nothing artifact writes

use crate::config::DEFAULT_TITLE;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// `<title>.<extension>`, keeping the full (untruncated) title.
///
/// Path separators are replaced so the title cannot point outside the
/// output directory.
pub fn artifact_file_name(title: &str, extension: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    let stem = if stem.is_empty() { DEFAULT_TITLE } else { stem.as_str() };

    format!("{}.{}", stem, extension)
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
///
/// A failed write never leaves a truncated file at `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let filename = path
        .file_name()
        .ok_or_else(|| anyhow!("Path has no filename: {}", path.display()))?
        .to_string_lossy();
    let tmp_path = path.with_file_name(format!(".{}.partial", filename));

    if let Err(err) = fs::write(&tmp_path, bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("Failed to write {}", tmp_path.display()));
    }

    fs::rename(&tmp_path, path).with_context(|| {
        let _ = fs::remove_file(&tmp_path);
        format!("Failed to move export into place: {}", path.display())
    })?;

    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
