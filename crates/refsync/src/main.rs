use std::{
    io::{self, IsTerminal},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use librefsync::{ExportManifest, ExportSource, Fallback, RefSync, RustdocSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line interface for the `refsync` binary.
struct Cli {
    /// Repository root all other paths are relative to
    #[arg(long, default_value = ".", env = "REFSYNC_ROOT", global = true)]
    root: PathBuf,

    /// Directory holding stub files, the index and the module listing
    #[arg(long, default_value = "docs/sphinx/source", global = true)]
    source_dir: PathBuf,

    /// Directory of rendered markdown reference pages
    #[arg(long, default_value = "docs/api/python", global = true)]
    api_dir: PathBuf,

    /// Directory of the site generator project
    #[arg(long, default_value = "website", global = true)]
    website_dir: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
/// Supported stages.
enum Commands {
    /// Discover modules and reconcile stubs, index and listing
    Sync(SyncArgs),
    /// Wrap signature headings in rendered markdown in fenced code blocks
    Wrap(WrapArgs),
    /// Run `sync` and then `wrap`
    All {
        /// Discovery options.
        #[command(flatten)]
        sync: SyncArgs,
        /// Wrapping options.
        #[command(flatten)]
        wrap: WrapArgs,
    },
    /// Set the current docs version in the site configuration
    StampVersion {
        /// Version such as 0.7 or 1.2.3
        version: String,
    },
}

#[derive(Args)]
/// Options for module discovery.
struct SyncArgs {
    /// JSON export manifest of the library (relative to the root)
    #[arg(long, default_value = "docs/api-exports.json")]
    exports: PathBuf,

    /// Read exports from a rustdoc JSON file instead of an export manifest
    #[arg(long, conflicts_with = "crate_manifest")]
    rustdoc_json: Option<PathBuf>,

    /// Generate rustdoc JSON for this Cargo.toml (needs the nightly toolchain)
    #[arg(long)]
    crate_manifest: Option<PathBuf>,

    /// Root module documented when the library cannot be loaded
    #[arg(long, default_value = "qumat")]
    fallback_root: String,

    /// Submodule documented when the library cannot be loaded
    #[arg(long, default_value = "qdp")]
    fallback_submodule: String,

    /// Prefix written before each module in the listing file
    #[arg(long, default_value = "api/python/")]
    listing_prefix: String,

    /// Index page title [default: "<root> Python API"]
    #[arg(long)]
    index_title: Option<String>,
}

#[derive(Args)]
/// Options for signature wrapping.
struct WrapArgs {
    /// Language tag of the fenced signature blocks
    #[arg(long, default_value = "python")]
    language: String,
}

impl Cli {
    /// Build the configured RefSync facade.
    fn refsync(&self) -> RefSync {
        RefSync::new(&self.root)
            .with_source_dir(&self.source_dir)
            .with_api_dir(&self.api_dir)
            .with_website_dir(&self.website_dir)
    }
}

impl SyncArgs {
    /// Pick the export source selected on the command line.
    fn source(&self, root: &Path) -> Box<dyn ExportSource> {
        if let Some(path) = &self.rustdoc_json {
            Box::new(RustdocSource::Json(root.join(path)))
        } else if let Some(path) = &self.crate_manifest {
            Box::new(RustdocSource::Manifest(root.join(path)))
        } else {
            Box::new(ExportManifest::new(root.join(&self.exports)))
        }
    }

    /// Apply discovery options.
    fn configure(&self, refsync: RefSync) -> RefSync {
        refsync
            .with_fallback(Fallback {
                root: self.fallback_root.clone(),
                submodule: self.fallback_submodule.clone(),
            })
            .with_listing_prefix(self.listing_prefix.clone())
            .with_index_title(self.index_title.clone())
    }
}

/// Run discovery and stub reconciliation.
fn run_sync(refsync: &RefSync, args: &SyncArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source = args.source(refsync.root());
    let report = refsync.sync(&*source)?;
    info!(
        "{} module(s), {} stub(s) created, index {}, listing {}",
        report.modules.len(),
        report.created.len(),
        if report.index_written { "written" } else { "unchanged" },
        if report.listing_written { "written" } else { "unchanged" },
    );
    Ok(())
}

/// Run signature wrapping.
fn run_wrap(refsync: &RefSync) -> Result<(), Box<dyn std::error::Error>> {
    let report = refsync.wrap()?;
    info!("{} of {} file(s) wrapped", report.changed, report.scanned);
    Ok(())
}

/// Dispatch the selected subcommand.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let refsync = cli.refsync();
    match &cli.command {
        Commands::Sync(args) => run_sync(&args.configure(refsync), args),
        Commands::Wrap(args) => run_wrap(&refsync.with_language(args.language.clone())),
        Commands::All { sync, wrap } => {
            let refsync = sync
                .configure(refsync)
                .with_language(wrap.language.clone());
            run_sync(&refsync, sync)?;
            run_wrap(&refsync)
        }
        Commands::StampVersion { version } => {
            refsync.stamp_version(version)?;
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
