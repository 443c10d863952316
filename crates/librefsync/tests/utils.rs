// Dead code detection breaks here, because the integration test crates all use a disjoint set of
// the pub items.
#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use librefsync::{Export, ExportKind, LibraryExports};
use tempfile::TempDir;

/// A library exporting the given modules plus a few non-module names.
pub fn library(root: &str, modules: &[&str]) -> LibraryExports {
    let mut exports: Vec<Export> = modules
        .iter()
        .map(|name| Export::new(*name, ExportKind::Module))
        .collect();
    exports.push(Export::new("QuMat", ExportKind::Class));
    exports.push(Export::new("run", ExportKind::Function));
    LibraryExports {
        root: root.to_string(),
        exports,
    }
}

/// Write an export manifest for `library` into `dir` and return its path.
pub fn write_manifest(dir: &Path, library: &LibraryExports) -> PathBuf {
    let path = dir.join("exports.json");
    fs::write(&path, serde_json::to_string_pretty(library).unwrap()).unwrap();
    path
}

/// Read every regular file in `dir` into a sorted list of (name, contents) pairs.
pub fn snapshot(dir: &Path) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_file())
        .map(|path| {
            (
                path.file_name().unwrap().to_string_lossy().into_owned(),
                fs::read_to_string(&path).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}

/// Modification time of `path`.
pub fn mtime(path: &Path) -> std::time::SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

/// A scratch repository root.
pub fn repo() -> TempDir {
    TempDir::new().unwrap()
}
