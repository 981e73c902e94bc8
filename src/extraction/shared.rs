use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Detect regular files in `dir` whose name ends with `suffix` (ASCII case-insensitive)
///
/// Returns `(path, stem)` pairs where `stem` is the filename with the suffix
/// removed. Entries named exactly `suffix`, directories, and names that are
/// not valid UTF-8 are skipped. Results are sorted by path so passes run in a
/// stable order.
pub(crate) fn detect_by_suffix(dir: &Path, suffix: &str) -> Result<Vec<(PathBuf, String)>> {
    debug!(?dir, suffix, "scanning for archives");

    let mut found = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        // Follows symlinks, like the skip check in the fetcher
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(?path, "skipping non UTF-8 filename");
            continue;
        };

        if let Some(stem) = strip_suffix_ignore_case(name, suffix) {
            if stem.is_empty() {
                debug!(?path, "skipping file with empty stem");
                continue;
            }
            let stem = stem.to_string();
            found.push((path, stem));
        }
    }

    found.sort();
    debug!(suffix, count = found.len(), "found {} candidate(s)", found.len());
    Ok(found)
}

/// Strip `suffix` from the end of `name`, ignoring ASCII case
pub(crate) fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

/// Remove a fully processed archive
pub(crate) fn remove_archive(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Whether an error from a decoder or archive reader points at the archive's
/// contents rather than at the filesystem
///
/// flate2 reports bad headers as `InvalidInput` and corrupt data as
/// `InvalidData`, truncated input surfaces as `UnexpectedEof`, and tar format
/// errors carry `Other`. Everything else (permissions, a full disk, a missing
/// destination) is an I/O failure.
pub(crate) fn is_format_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::Other
    )
}
