//! Stamping the documentation version into the site generator's configuration.
//!
//! The site config carries a `current` version label and a `versions` table. The label is set to
//! the new version and the table is rebuilt from `versions.json`, so only versions that have
//! actually been snapshotted are listed.

use std::{fs, path::Path};

use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};
use tracing::{debug, info};

use crate::{
    error::{RefSyncError, Result},
    fileutils::write_if_changed,
};

/// Site configuration file, relative to the website directory.
pub const CONFIG_FILE: &str = "docusaurus.config.ts";

/// Snapshotted versions, relative to the website directory.
pub const VERSIONS_FILE: &str = "versions.json";

/// `0.7` or `1.2.3`.
static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").expect("version pattern"));

/// The label of the `current` version entry.
static CURRENT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(current:\s*\{\s*label:\s*)'[^']+'").expect("current label pattern")
});

/// The whole `versions: { ... }` table up to and including the enclosing object's close.
static VERSIONS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)versions:\s*\{[\s\S]*?^          \},\s*\n\s*\},").expect("versions pattern")
});

/// Check that `version` is a two- or three-part numeric version.
pub fn validate_version(version: &str) -> Result<()> {
    if VERSION.is_match(version) {
        Ok(())
    } else {
        Err(RefSyncError::InvalidVersion(version.to_string()))
    }
}

/// Read `versions.json`. A missing or malformed file means no snapshotted versions.
pub fn read_versions(path: &Path) -> Vec<String> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str(&content) {
        Ok(versions) => versions,
        Err(e) => {
            debug!("ignoring {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Render the replacement `versions` table.
fn render_versions_block(version: &str, existing: &[String]) -> String {
    let mut block = format!(
        "versions: {{\n            current: {{\n              label: '{version}',\n              path: '',\n            }}"
    );
    for v in existing {
        block.push_str(&format!(
            ",\n            '{v}': {{\n              label: '{v}',\n              path: '{v}',\n            }}"
        ));
    }
    block.push_str("\n          }");
    block
}

/// Apply the version to the text of a site configuration.
pub fn stamp_config(config: &str, version: &str, existing: &[String]) -> String {
    let labelled = CURRENT_LABEL.replace(config, |caps: &Captures<'_>| {
        format!("{}'{version}'", &caps[1])
    });
    let block = format!(
        "{},\n        }},",
        render_versions_block(version, existing)
    );
    VERSIONS_BLOCK
        .replace(&labelled, NoExpand(&block))
        .into_owned()
}

/// Set the current docs version in `website_dir` and sync the versions table.
///
/// Returns whether the configuration file changed.
pub fn stamp_version(website_dir: &Path, version: &str) -> Result<bool> {
    validate_version(version)?;
    let config_path = website_dir.join(CONFIG_FILE);
    let config = fs::read_to_string(&config_path)?;
    let existing = read_versions(&website_dir.join(VERSIONS_FILE));

    let stamped = stamp_config(&config, version, &existing);
    let changed = write_if_changed(&config_path, &stamped)?;
    if changed {
        info!(
            "Updated {CONFIG_FILE}: current label '{version}', {} versioned snapshot(s).",
            existing.len()
        );
    } else {
        debug!("{CONFIG_FILE} already at version '{version}'");
    }
    Ok(changed)
}
