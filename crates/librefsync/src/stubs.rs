//! Stub, index and listing files consumed by the reference renderer.
//!
//! Stubs are written once and then belong to whoever edits them. The index and the listing are
//! derived entirely from the discovered set and are regenerated on every run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{discover::ModuleId, error::Result, fileutils::write_if_changed};

/// File name of the generated index.
pub const INDEX_FILE: &str = "index.rst";

/// File name of the flat module listing.
pub const LISTING_FILE: &str = "api_module_list.txt";

/// Path of the stub file for `module` inside `dir`.
pub fn stub_path(module: &ModuleId, dir: &Path) -> PathBuf {
    dir.join(format!("{module}.rst"))
}

/// Render a title with an `=` underline of matching width.
fn heading(title: &str) -> String {
    format!("{title}\n{}", "=".repeat(title.chars().count()))
}

/// Stub contents for `module`.
pub fn render_stub(module: &ModuleId) -> String {
    format!(
        "{}\n\n.. automodule:: {module}\n   :members:\n   :undoc-members:\n   :show-inheritance:\n",
        heading(&module.title())
    )
}

/// Create the stub for `module` in `dir` unless one already exists.
///
/// Returns `true` if a stub was created. Existing stubs are never touched.
pub fn ensure_stub(module: &ModuleId, dir: &Path) -> Result<bool> {
    fs::create_dir_all(dir)?;
    let path = stub_path(module, dir);
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, render_stub(module))?;
    info!("Created {module}.rst");
    Ok(true)
}

/// Index contents listing `modules` in the order given.
pub fn render_index<'a>(title: &str, modules: impl IntoIterator<Item = &'a ModuleId>) -> String {
    let entries: Vec<String> = modules.into_iter().map(|m| format!("   {m}")).collect();
    format!(
        ".. {title}\n\n{}\n\n.. toctree::\n   :maxdepth: 2\n\n{}\n",
        heading(title),
        entries.join("\n")
    )
}

/// Regenerate the index in `dir`. Returns `true` if the file content changed.
pub fn write_index<'a>(
    title: &str,
    modules: impl IntoIterator<Item = &'a ModuleId>,
    dir: &Path,
) -> Result<bool> {
    fs::create_dir_all(dir)?;
    write_if_changed(&dir.join(INDEX_FILE), &render_index(title, modules))
}

/// Listing contents: one `prefix + module` line per module, without a trailing newline.
pub fn render_listing<'a>(prefix: &str, modules: impl IntoIterator<Item = &'a ModuleId>) -> String {
    modules
        .into_iter()
        .map(|m| format!("{prefix}{m}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Regenerate the listing in `dir`. Returns `true` if the file content changed.
pub fn write_listing<'a>(
    prefix: &str,
    modules: impl IntoIterator<Item = &'a ModuleId>,
    dir: &Path,
) -> Result<bool> {
    fs::create_dir_all(dir)?;
    write_if_changed(&dir.join(LISTING_FILE), &render_listing(prefix, modules))
}
