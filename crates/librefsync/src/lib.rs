//! Keep a generated API reference tree synchronized with a library's public surface.
//!
//! Two independent stages share no state:
//!
//! - module discovery and stub reconciliation ([`RefSync::sync`]), run before the reference
//!   renderer, and
//! - signature wrapping ([`RefSync::wrap`]), run over the renderer's markdown output.
//!
//! Both are idempotent: running either again without an upstream change leaves every file
//! untouched.

/// Module discovery from a library's export list.
pub mod discover;
/// Crate-wide error type.
mod error;
/// File writes that skip unchanged content.
mod fileutils;
/// Export list sources.
pub mod library;
/// The [`RefSync`] facade.
mod refsync;
/// Signature heading recognition.
pub mod signature;
/// Stub, index and listing files.
pub mod stubs;
/// Docs version stamping for the site generator.
pub mod version;
/// In-place wrapping of reference markdown files.
pub mod wrap;

pub use crate::{
    discover::{DiscoveredSet, Fallback, ModuleId},
    error::{RefSyncError, Result},
    library::{Export, ExportKind, ExportManifest, ExportSource, LibraryExports, RustdocSource},
    refsync::{RefSync, SyncReport},
    signature::{Heading, TypeRole, Wrapped},
    wrap::WrapReport,
};
