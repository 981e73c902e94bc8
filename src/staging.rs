//! Staging files for atomic writes into a dataset directory
//!
//! Downloads and decompressed outputs are written to `.<random>.part` next to
//! their destination and renamed into place once complete. A killed process
//! never drops its staging file, so leftovers are swept at the start of the
//! next fetch.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

const STAGING_PREFIX: &str = ".";
const STAGING_SUFFIX: &str = ".part";

/// Create a staging file in the directory that will hold `dest`
pub(crate) fn stage_for(dest: &Path) -> Result<NamedTempFile> {
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))
}

fn is_staging_name(name: &str) -> bool {
    name.len() > STAGING_PREFIX.len() + STAGING_SUFFIX.len()
        && name.starts_with(STAGING_PREFIX)
        && name.ends_with(STAGING_SUFFIX)
}

/// Remove staging files left behind by an interrupted run
///
/// Names listed in `keep` are never removed, even if they look like staging
/// files. Returns the removed paths.
pub(crate) fn remove_stale(dir: &Path, keep: &[String]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_staging_name(name) || keep.iter().any(|k| k == name) {
            continue;
        }
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        std::fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        info!(?path, "removed stale staging file");
        removed.push(path);
    }

    removed.sort();
    Ok(removed)
}
