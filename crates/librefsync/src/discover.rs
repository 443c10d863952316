//! Discovery of the modules that need a reference page.

use std::{fmt, iter};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::library::{ExportSource, LibraryExports};

/// A single name component: letters, digits and underscores.
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("identifier pattern"));

/// Whether `name` can be one component of a dotted module name.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// A dotted module name such as `qumat` or `qumat.qdp`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    /// The library's root module.
    pub fn root(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// A direct submodule of `root`.
    pub fn child(root: &str, name: &str) -> Self {
        Self(format!("{root}.{name}"))
    }

    /// The dotted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a submodule rather than a root module.
    pub fn is_nested(&self) -> bool {
        self.0.contains('.')
    }

    /// Page title for the module's stub.
    ///
    /// Nested modules use the full dotted name. A root module uses its name with underscores
    /// turned into spaces and every word capitalized, so `quantum_tools` becomes
    /// `Quantum Tools`.
    pub fn title(&self) -> String {
        if self.is_nested() {
            return self.0.clone();
        }
        title_case(&self.0.replace('_', " "))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capitalize the first letter of every run of cased letters and lowercase the rest.
///
/// Uncased characters such as digits or CJK ideographs end a word.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_lowercase() || c.is_uppercase() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// The sorted, de-duplicated modules selected for documentation in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSet {
    /// Modules in lexical order.
    modules: Vec<ModuleId>,
}

impl DiscoveredSet {
    /// Build the set from a library's exports: the root plus every module-valued export.
    ///
    /// Module exports whose name is not an identifier cannot name a submodule and are skipped
    /// with a warning.
    pub fn from_exports(library: &LibraryExports) -> Self {
        let modules = iter::once(ModuleId::root(library.root.as_str()))
            .chain(
                library
                    .exports
                    .iter()
                    .filter(|export| export.is_module())
                    .filter(|export| {
                        let valid = is_identifier(&export.name);
                        if !valid {
                            warn!(
                                "skipping export {:?} of {}: not an identifier",
                                export.name, library.root
                            );
                        }
                        valid
                    })
                    .map(|export| ModuleId::child(&library.root, &export.name)),
            )
            .collect();
        Self::from_modules(modules)
    }

    /// Sort and de-duplicate an arbitrary list of modules.
    pub fn from_modules(mut modules: Vec<ModuleId>) -> Self {
        modules.sort();
        modules.dedup();
        Self { modules }
    }

    /// Modules in order.
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// Iterate over the modules in order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.iter()
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the set is empty. A discovered set always holds at least the root.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// The set used when the library cannot be loaded: the root and one known submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    /// Root module name.
    pub root: String,
    /// Name of the submodule that is always documented.
    pub submodule: String,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            root: "qumat".to_string(),
            submodule: "qdp".to_string(),
        }
    }
}

impl Fallback {
    /// The two-element fallback set, root first.
    pub fn modules(&self) -> DiscoveredSet {
        DiscoveredSet {
            modules: vec![
                ModuleId::root(self.root.as_str()),
                ModuleId::child(&self.root, &self.submodule),
            ],
        }
    }
}

/// Discover the modules to document.
///
/// Never fails: if the library cannot be loaded a warning is emitted and the fallback set is
/// returned instead.
pub fn discover(source: &dyn ExportSource, fallback: &Fallback) -> DiscoveredSet {
    match source.load() {
        Ok(library) => DiscoveredSet::from_exports(&library),
        Err(e) => {
            warn!("could not load {}: {e}", fallback.root);
            fallback.modules()
        }
    }
}
