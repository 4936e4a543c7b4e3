//! Storage for uploaded files.
//!
//! Uploads are written under `[uploads] dir` as `<unix_ts>_<sanitized name>`.

use anyhow::{Context, Result};
use std::path::Path;

/// Reduce a client-supplied file name to a safe single path component.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; spaces become `_`; all
/// other characters and leading dots are dropped. Falls back to `upload`.
pub fn sanitize_filename(name: &str) -> String {
    // ignore any directory part the client sent
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            _ => None,
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Write `bytes` into `dir` and return the stored file name.
pub fn save_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create upload dir: {}", dir.display()))?;

    let filename = format!(
        "{}_{}",
        chrono::Utc::now().timestamp(),
        sanitize_filename(original_name)
    );
    let path = dir.join(&filename);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write upload: {}", path.display()))?;

    log::debug!("Saved upload {} ({} bytes)", path.display(), bytes.len());
    Ok(filename)
}
