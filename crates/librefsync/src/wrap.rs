//! In-place rewriting of generated reference markdown files.

use std::{fs, path::Path};

use tracing::info;

use crate::{error::Result, signature::wrap_text};

/// Outcome of wrapping a directory of reference files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapReport {
    /// Markdown files examined.
    pub scanned: usize,
    /// Files that were rewritten.
    pub changed: usize,
}

/// Wrap the signature headings of one file.
///
/// The file is rewritten only if the result differs from what is on disk, so a file without
/// signature headings keeps both its content and its modification time. Returns whether the
/// file was rewritten.
pub fn process_file(path: &Path, language: &str) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    let (wrapped, _) = wrap_text(&content, language);
    if wrapped == content {
        return Ok(false);
    }
    fs::write(path, wrapped)?;
    Ok(true)
}

/// Wrap every `*.md` file directly inside `dir`, in name order. Hidden files are skipped.
///
/// A missing directory means the renderer has not produced anything yet and yields an empty
/// report.
pub fn wrap_dir(dir: &Path, language: &str) -> Result<WrapReport> {
    let mut report = WrapReport::default();
    if !dir.is_dir() {
        return Ok(report);
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        if !hidden && path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        report.scanned += 1;
        if process_file(&path, language)? {
            report.changed += 1;
            if let Some(name) = path.file_name() {
                info!("Wrapped signatures: {}", name.to_string_lossy());
            }
        }
    }
    if report.changed > 0 {
        info!("Updated {} file(s).", report.changed);
    }
    Ok(report)
}
