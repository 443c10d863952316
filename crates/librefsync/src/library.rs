//! Access to the public export list of the library being documented.
//!
//! Discovery never inspects the library directly. Instead an [`ExportSource`] answers one
//! question: which names does the root module export, and which of those are modules? Two
//! sources are provided: a JSON manifest declared by the library's build metadata, and rustdoc
//! JSON for Rust libraries.

use std::{fs, path::PathBuf};

use rustdoc_types::{Crate, Item, ItemEnum, ItemKind, Visibility};
use serde::{Deserialize, Serialize};

use crate::{
    discover::is_identifier,
    error::{RefSyncError, Result},
};

/// The kind of value bound to an exported name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// A submodule. Only these are documented as separate pages.
    Module,
    /// A class, struct, enum, union or trait.
    Class,
    /// A free function.
    Function,
    /// A constant or static value.
    Constant,
    /// Anything else, including kinds this version does not know about.
    #[serde(other)]
    Other,
}

/// One entry in the root module's export list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    /// The exported name, relative to the root module.
    pub name: String,
    /// What the name is bound to.
    pub kind: ExportKind,
}

impl Export {
    /// Create an export entry.
    pub fn new(name: impl Into<String>, kind: ExportKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether this export is a module and therefore gets its own reference page.
    pub fn is_module(&self) -> bool {
        self.kind == ExportKind::Module
    }
}

/// The root module name together with its declared exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryExports {
    /// Name of the library's root module.
    pub root: String,
    /// Declared exports, in declaration order.
    #[serde(default)]
    pub exports: Vec<Export>,
}

/// Something that can load a library's export list.
///
/// Loading may fail when the library is absent or broken; callers decide how to recover.
pub trait ExportSource {
    /// Load the root module name and its exports.
    fn load(&self) -> Result<LibraryExports>;
}

impl ExportSource for LibraryExports {
    fn load(&self) -> Result<LibraryExports> {
        Ok(self.clone())
    }
}

/// Export list declared in a JSON file shipped with the library.
///
/// ```json
/// {"root": "qumat", "exports": [{"name": "qdp", "kind": "module"}]}
/// ```
#[derive(Debug, Clone)]
pub struct ExportManifest {
    /// Location of the manifest file.
    path: PathBuf,
}

impl ExportManifest {
    /// Reference a manifest file. Nothing is read until [`ExportSource::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExportSource for ExportManifest {
    fn load(&self) -> Result<LibraryExports> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            RefSyncError::LibraryUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        let exports: LibraryExports = serde_json::from_str(&content)?;
        if !is_identifier(&exports.root) {
            return Err(RefSyncError::LibraryUnavailable(format!(
                "{}: invalid root module name {:?}",
                self.path.display(),
                exports.root
            )));
        }
        Ok(exports)
    }
}

/// Export list read from rustdoc JSON output.
#[derive(Debug, Clone)]
pub enum RustdocSource {
    /// A rustdoc JSON file that has already been generated.
    Json(PathBuf),
    /// A `Cargo.toml` for which rustdoc JSON is generated with the nightly toolchain.
    Manifest(PathBuf),
}

impl RustdocSource {
    /// Generate or read the rustdoc JSON and parse it.
    fn read_crate(&self) -> Result<Crate> {
        let json_path = match self {
            Self::Json(path) => path.clone(),
            Self::Manifest(manifest_path) => rustdoc_json::Builder::default()
                .toolchain("nightly")
                .manifest_path(manifest_path)
                .silent(true)
                .build()
                .map_err(|e| RefSyncError::RustdocJsonError(e.to_string()))?,
        };
        let json_content = fs::read_to_string(&json_path).map_err(|e| {
            RefSyncError::LibraryUnavailable(format!("{}: {e}", json_path.display()))
        })?;
        Ok(serde_json::from_str(&json_content)?)
    }
}

impl ExportSource for RustdocSource {
    fn load(&self) -> Result<LibraryExports> {
        exports_from_crate(&self.read_crate()?)
    }
}

/// Collect the public items of the crate root as exports.
pub fn exports_from_crate(crate_data: &Crate) -> Result<LibraryExports> {
    let root_item = crate_data.index.get(&crate_data.root).ok_or_else(|| {
        RefSyncError::LibraryUnavailable("root item missing from rustdoc index".to_string())
    })?;
    let ItemEnum::Module(root_module) = &root_item.inner else {
        return Err(RefSyncError::LibraryUnavailable(
            "crate root is not a module".to_string(),
        ));
    };
    let root = root_item.name.clone().ok_or_else(|| {
        RefSyncError::LibraryUnavailable("crate root has no name".to_string())
    })?;

    let exports = root_module
        .items
        .iter()
        .filter_map(|id| crate_data.index.get(id))
        .filter(|item| matches!(item.visibility, Visibility::Public))
        .filter_map(|item| export_for_item(crate_data, item))
        .collect();

    Ok(LibraryExports { root, exports })
}

/// Map one public root item to an export. Glob re-exports have no single name and are skipped.
fn export_for_item(crate_data: &Crate, item: &Item) -> Option<Export> {
    match &item.inner {
        ItemEnum::Use(use_item) => {
            if use_item.is_glob {
                return None;
            }
            let kind = use_item.id.as_ref().map_or(ExportKind::Other, |id| {
                if let Some(target) = crate_data.index.get(id) {
                    kind_of_item(&target.inner)
                } else if let Some(summary) = crate_data.paths.get(id) {
                    kind_of_summary(&summary.kind)
                } else {
                    ExportKind::Other
                }
            });
            Some(Export::new(use_item.name.clone(), kind))
        }
        inner => Some(Export::new(item.name.clone()?, kind_of_item(inner))),
    }
}

/// Classify a local item.
fn kind_of_item(inner: &ItemEnum) -> ExportKind {
    match inner {
        ItemEnum::Module(_) => ExportKind::Module,
        ItemEnum::Struct(_) | ItemEnum::Enum(_) | ItemEnum::Union(_) | ItemEnum::Trait(_) => {
            ExportKind::Class
        }
        ItemEnum::Function(_) => ExportKind::Function,
        ItemEnum::Constant { .. } | ItemEnum::Static(_) => ExportKind::Constant,
        _ => ExportKind::Other,
    }
}

/// Classify an item known only through the crate's path table (e.g. a re-exported dependency).
fn kind_of_summary(kind: &ItemKind) -> ExportKind {
    match kind {
        ItemKind::Module => ExportKind::Module,
        ItemKind::Struct | ItemKind::Enum | ItemKind::Union | ItemKind::Trait => ExportKind::Class,
        ItemKind::Function => ExportKind::Function,
        ItemKind::Constant | ItemKind::Static => ExportKind::Constant,
        _ => ExportKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::DiscoveredSet;
    use pretty_assertions::assert_eq;
    use rustdoc_types::{
        Abi, Constant, FORMAT_VERSION, Function, FunctionHeader, FunctionSignature, Generics, Id,
        ItemSummary, Module, Struct, StructKind, Target, Type, Use,
    };
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn item(id: u32, name: Option<&str>, visibility: Visibility, inner: ItemEnum) -> Item {
        Item {
            id: Id(id),
            crate_id: 0,
            name: name.map(str::to_string),
            span: None,
            visibility,
            docs: None,
            links: HashMap::new(),
            attrs: Vec::new(),
            deprecation: None,
            inner,
        }
    }

    fn module(items: &[u32]) -> ItemEnum {
        ItemEnum::Module(Module {
            is_crate: false,
            items: items.iter().copied().map(Id).collect(),
            is_stripped: false,
        })
    }

    fn reexport(id: u32, source: &str, name: &str, target: Option<u32>, is_glob: bool) -> Item {
        item(
            id,
            None,
            Visibility::Public,
            ItemEnum::Use(Use {
                source: source.to_string(),
                name: name.to_string(),
                id: target.map(Id),
                is_glob,
            }),
        )
    }

    /// A crate shaped like:
    ///
    /// ```ignore
    /// pub mod alpha {}
    /// mod private { pub mod inner {} }
    /// pub use private::inner as beta;
    /// pub use private::*;
    /// pub use std::collections;
    /// pub struct Widget;
    /// pub fn run() {}
    /// pub const X: u32 = 1;
    /// fn hidden() {}
    /// ```
    fn sample_crate() -> Crate {
        let function = || {
            ItemEnum::Function(Function {
                sig: FunctionSignature {
                    inputs: Vec::new(),
                    output: None,
                    is_c_variadic: false,
                },
                generics: Generics {
                    params: Vec::new(),
                    where_predicates: Vec::new(),
                },
                header: FunctionHeader {
                    is_const: false,
                    is_unsafe: false,
                    is_async: false,
                    abi: Abi::Rust,
                },
                has_body: true,
            })
        };
        let root = ItemEnum::Module(Module {
            is_crate: true,
            items: [1, 2, 4, 5, 6, 7, 8, 9, 10].into_iter().map(Id).collect(),
            is_stripped: false,
        });

        let items = vec![
            item(0, Some("demo"), Visibility::Public, root),
            item(1, Some("alpha"), Visibility::Public, module(&[])),
            item(2, Some("private"), Visibility::Default, module(&[3])),
            item(3, Some("inner"), Visibility::Public, module(&[])),
            reexport(4, "private::inner", "beta", Some(3), false),
            reexport(5, "private", "private", Some(2), true),
            reexport(6, "std::collections", "collections", Some(100), false),
            item(
                7,
                Some("Widget"),
                Visibility::Public,
                ItemEnum::Struct(Struct {
                    kind: StructKind::Unit,
                    generics: Generics {
                        params: Vec::new(),
                        where_predicates: Vec::new(),
                    },
                    impls: Vec::new(),
                }),
            ),
            item(8, Some("run"), Visibility::Public, function()),
            item(
                9,
                Some("X"),
                Visibility::Public,
                ItemEnum::Constant {
                    type_: Type::Primitive("u32".to_string()),
                    const_: Constant {
                        expr: "1".to_string(),
                        value: Some("1u32".to_string()),
                        is_literal: true,
                    },
                },
            ),
            item(10, Some("hidden"), Visibility::Default, function()),
        ];

        let paths = HashMap::from([(
            Id(100),
            ItemSummary {
                crate_id: 1,
                path: vec!["std".to_string(), "collections".to_string()],
                kind: ItemKind::Module,
            },
        )]);

        Crate {
            root: Id(0),
            crate_version: None,
            includes_private: false,
            index: items.into_iter().map(|item| (item.id, item)).collect(),
            paths,
            external_crates: HashMap::new(),
            target: Target {
                triple: "x86_64-unknown-linux-gnu".to_string(),
                target_features: Vec::new(),
            },
            format_version: FORMAT_VERSION,
        }
    }

    #[test]
    fn test_manifest_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("exports.json");
        fs::write(
            &path,
            r#"{
                "root": "qumat",
                "exports": [
                    {"name": "qdp", "kind": "module"},
                    {"name": "QuMat", "kind": "class"},
                    {"name": "widget", "kind": "something-new"}
                ]
            }"#,
        )?;

        let exports = ExportManifest::new(&path).load()?;
        assert_eq!(exports.root, "qumat");
        assert_eq!(
            exports.exports,
            vec![
                Export::new("qdp", ExportKind::Module),
                Export::new("QuMat", ExportKind::Class),
                Export::new("widget", ExportKind::Other),
            ]
        );
        assert!(exports.exports[0].is_module());
        assert!(!exports.exports[1].is_module());
        Ok(())
    }

    #[test]
    fn test_manifest_without_exports() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("exports.json");
        fs::write(&path, r#"{"root": "solo"}"#)?;

        let exports = ExportManifest::new(&path).load()?;
        assert_eq!(exports.root, "solo");
        assert!(exports.exports.is_empty());
        Ok(())
    }

    #[test]
    fn test_manifest_failures() -> Result<()> {
        let temp_dir = TempDir::new()?;

        let missing = ExportManifest::new(temp_dir.path().join("missing.json"));
        assert!(matches!(
            missing.load(),
            Err(RefSyncError::LibraryUnavailable(_))
        ));

        let broken_path = temp_dir.path().join("broken.json");
        fs::write(&broken_path, "{ not json")?;
        assert!(matches!(
            ExportManifest::new(&broken_path).load(),
            Err(RefSyncError::JsonParseError(_))
        ));

        let unnamed_path = temp_dir.path().join("unnamed.json");
        fs::write(&unnamed_path, r#"{"root": "", "exports": []}"#)?;
        assert!(matches!(
            ExportManifest::new(&unnamed_path).load(),
            Err(RefSyncError::LibraryUnavailable(_))
        ));

        let escaping_path = temp_dir.path().join("escaping.json");
        fs::write(&escaping_path, r#"{"root": "../up", "exports": []}"#)?;
        assert!(matches!(
            ExportManifest::new(&escaping_path).load(),
            Err(RefSyncError::LibraryUnavailable(_))
        ));
        Ok(())
    }

    #[test]
    fn test_exports_from_crate() -> Result<()> {
        let exports = exports_from_crate(&sample_crate())?;
        assert_eq!(
            exports,
            LibraryExports {
                root: "demo".to_string(),
                exports: vec![
                    Export::new("alpha", ExportKind::Module),
                    Export::new("beta", ExportKind::Module),
                    Export::new("collections", ExportKind::Module),
                    Export::new("Widget", ExportKind::Class),
                    Export::new("run", ExportKind::Function),
                    Export::new("X", ExportKind::Constant),
                ],
            }
        );
        Ok(())
    }

    #[test]
    fn test_rustdoc_json_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("demo.json");
        fs::write(&path, serde_json::to_string(&sample_crate())?)?;

        let exports = RustdocSource::Json(path).load()?;
        assert_eq!(exports.root, "demo");

        let modules = DiscoveredSet::from_exports(&exports);
        let names: Vec<&str> = modules.iter().map(|m| m.as_str()).collect();
        assert_eq!(
            names,
            vec!["demo", "demo.alpha", "demo.beta", "demo.collections"]
        );
        Ok(())
    }

    #[test]
    fn test_rustdoc_json_failures() -> Result<()> {
        let temp_dir = TempDir::new()?;

        let missing = RustdocSource::Json(temp_dir.path().join("missing.json"));
        assert!(matches!(
            missing.load(),
            Err(RefSyncError::LibraryUnavailable(_))
        ));

        let broken_path = temp_dir.path().join("crate.json");
        fs::write(&broken_path, "[]")?;
        assert!(RustdocSource::Json(broken_path).load().is_err());
        Ok(())
    }
}
