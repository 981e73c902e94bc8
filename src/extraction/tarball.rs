use crate::error::{Error, ExtractError, Result};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use super::shared::{detect_by_suffix, is_format_error, remove_archive};

const TAR_SUFFIX: &str = ".tar";

/// Unpacker for tar archives
pub struct TarExtractor;

impl TarExtractor {
    /// Detect `.tar` files in a directory
    pub fn detect_tar_files(dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(detect_by_suffix(dir, TAR_SUFFIX)?
            .into_iter()
            .map(|(path, _)| path)
            .collect())
    }

    /// Unpack every member of `archive_path` into `dest_path`
    ///
    /// Existing files are overwritten; when two members share a path the last
    /// one wins. Members whose path would land outside `dest_path` are
    /// skipped. Returns the paths of the regular files written.
    pub fn unpack(archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
        let malformed = |reason: String| ExtractError::MalformedArchive {
            archive: archive_path.to_path_buf(),
            reason,
        };

        let file = File::open(archive_path).map_err(|e| Error::io(archive_path, e))?;
        let mut archive = tar::Archive::new(file);
        archive.set_overwrite(true);

        let entries = archive.entries().map_err(|e| {
            if is_format_error(&e) {
                malformed(format!("failed to read entries: {}", e)).into()
            } else {
                Error::io(archive_path, e)
            }
        })?;

        let mut extracted = Vec::new();

        for entry in entries {
            let mut entry = entry.map_err(|e| {
                if is_format_error(&e) {
                    malformed(format!("failed to read entry header: {}", e)).into()
                } else {
                    Error::io(archive_path, e)
                }
            })?;

            let member = entry
                .path()
                .map_err(|e| malformed(format!("invalid member path: {}", e)))?
                .into_owned();
            let is_file = entry.header().entry_type().is_file();

            let unpacked = entry.unpack_in(dest_path).map_err(|e| {
                if is_format_error(&e) {
                    malformed(format!("failed to unpack {}: {}", member.display(), e)).into()
                } else {
                    Error::io(dest_path.join(&member), e)
                }
            })?;

            if !unpacked {
                warn!(archive = ?archive_path, ?member, "skipping entry with unsafe path");
                continue;
            }

            if is_file {
                // unpack_in drops root and `.` components before writing
                let relative: PathBuf = member
                    .components()
                    .filter(|c| matches!(c, Component::Normal(_)))
                    .collect();
                extracted.push(dest_path.join(relative));
            }
        }

        Ok(extracted)
    }

    /// Unpack every `.tar` file in `dir` into `dir` and remove the archives
    ///
    /// Returns the paths of all regular files written.
    pub fn unpack_all(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut outputs = Vec::new();

        for archive_path in Self::detect_tar_files(dir)? {
            info!(archive = ?archive_path, "untarring");

            let members = Self::unpack(&archive_path, dir)?;
            remove_archive(&archive_path)?;

            debug!(
                archive = ?archive_path,
                members = members.len(),
                "unpacked {} file(s)",
                members.len()
            );
            outputs.extend(members);
        }

        Ok(outputs)
    }
}
