use std::path::{Path, PathBuf};

use super::{
    discover::{DiscoveredSet, Fallback, ModuleId, discover},
    error::*,
    library::ExportSource,
    signature::DEFAULT_LANGUAGE,
    stubs::{ensure_stub, write_index, write_listing},
    version::stamp_version,
    wrap::{WrapReport, wrap_dir},
};

/// RefSync keeps a generated API reference tree in step with a library's public surface.
///
/// A docs build runs it in two stages around an external renderer:
///
/// 1. [`Self::sync`] discovers the library's documentable modules, creates any missing stub files
///    and regenerates the index and module listing.
/// 2. The renderer turns the stubs into markdown reference pages.
/// 3. [`Self::wrap`] rewrites signature headings in those pages into fenced code blocks.
///
/// All locations are relative to a repository root and default to the layout used by the
/// qumat documentation site.
#[derive(Debug, Clone)]
pub struct RefSync {
    /// Repository root every other path is resolved against.
    root: PathBuf,

    /// Directory holding stub files, the index and the module listing.
    source_dir: PathBuf,

    /// Directory of rendered markdown reference pages.
    api_dir: PathBuf,

    /// Directory of the site generator project.
    website_dir: PathBuf,

    /// Prefix prepended to every module in the listing file.
    listing_prefix: String,

    /// Modules documented when the library cannot be loaded.
    fallback: Fallback,

    /// Index title. Derived from the root module when unset.
    index_title: Option<String>,

    /// Language tag used on fenced signature blocks.
    language: String,
}

/// Outcome of a [`RefSync::sync`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// The discovered set, in index order.
    pub modules: DiscoveredSet,
    /// Stubs created during this run.
    pub created: Vec<ModuleId>,
    /// Whether the index file was rewritten.
    pub index_written: bool,
    /// Whether the listing file was rewritten.
    pub listing_written: bool,
}

impl RefSync {
    /// Creates a RefSync rooted at `root` with the default layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_dir: PathBuf::from("docs/sphinx/source"),
            api_dir: PathBuf::from("docs/api/python"),
            website_dir: PathBuf::from("website"),
            listing_prefix: "api/python/".to_string(),
            fallback: Fallback::default(),
            index_title: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Sets the stub directory, relative to the root.
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Sets the rendered markdown directory, relative to the root.
    pub fn with_api_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.api_dir = dir.into();
        self
    }

    /// Sets the site generator directory, relative to the root.
    pub fn with_website_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.website_dir = dir.into();
        self
    }

    /// Sets the prefix written before each module in the listing file.
    pub fn with_listing_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.listing_prefix = prefix.into();
        self
    }

    /// Sets the modules used when the library cannot be loaded.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Overrides the index title.
    pub fn with_index_title(mut self, title: Option<String>) -> Self {
        self.index_title = title;
        self
    }

    /// Sets the language tag of fenced signature blocks.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute stub directory.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.source_dir)
    }

    /// Absolute rendered markdown directory.
    pub fn api_dir(&self) -> PathBuf {
        self.root.join(&self.api_dir)
    }

    /// Absolute site generator directory.
    pub fn website_dir(&self) -> PathBuf {
        self.root.join(&self.website_dir)
    }

    /// Title used for the index page of `modules`.
    fn index_title(&self, modules: &DiscoveredSet) -> String {
        if let Some(title) = &self.index_title {
            return title.clone();
        }
        let root = modules
            .modules()
            .first()
            .map_or(self.fallback.root.as_str(), ModuleId::as_str);
        format!("{root} Python API")
    }

    /// Discover the documentable modules of the library behind `source`.
    pub fn discover(&self, source: &dyn ExportSource) -> DiscoveredSet {
        discover(source, &self.fallback)
    }

    /// Reconcile stubs, index and listing against the library's current modules.
    ///
    /// Existing stubs are never modified. The index and listing are regenerated from the
    /// discovered set and written only if their content changed.
    pub fn sync(&self, source: &dyn ExportSource) -> Result<SyncReport> {
        let source_dir = self.source_dir();
        let modules = self.discover(source);

        let mut created = Vec::new();
        for module in modules.iter() {
            if ensure_stub(module, &source_dir)? {
                created.push(module.clone());
            }
        }
        let index_written = write_index(&self.index_title(&modules), modules.iter(), &source_dir)?;
        let listing_written = write_listing(&self.listing_prefix, modules.iter(), &source_dir)?;

        Ok(SyncReport {
            modules,
            created,
            index_written,
            listing_written,
        })
    }

    /// Wrap signature headings in every rendered markdown page.
    pub fn wrap(&self) -> Result<WrapReport> {
        wrap_dir(&self.api_dir(), &self.language)
    }

    /// Stamp `version` into the site generator's configuration.
    pub fn stamp_version(&self, version: &str) -> Result<bool> {
        stamp_version(&self.website_dir(), version)
    }
}
