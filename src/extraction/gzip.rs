use crate::error::{Error, ExtractError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::shared::{detect_by_suffix, is_format_error, remove_archive};
use crate::staging::stage_for;

const GZIP_SUFFIX: &str = ".gz";

/// Decompressor for gzip files
pub struct GzipExtractor;

impl GzipExtractor {
    /// Detect `.gz` files in a directory
    pub fn detect_gzip_files(dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(detect_by_suffix(dir, GZIP_SUFFIX)?
            .into_iter()
            .map(|(path, _)| path)
            .collect())
    }

    /// Decompress `archive_path` to `output_path`, replacing any existing file
    ///
    /// The output is staged in a temporary file in the same directory and
    /// renamed into place only once the whole stream decoded cleanly. The
    /// archive itself is left untouched.
    pub fn decompress(archive_path: &Path, output_path: &Path) -> Result<u64> {
        let decompress_err = |reason: String| ExtractError::Decompress {
            archive: archive_path.to_path_buf(),
            reason,
        };

        let file = File::open(archive_path).map_err(|e| Error::io(archive_path, e))?;
        let mut decoder = MultiGzDecoder::new(BufReader::new(file));

        let mut staged = stage_for(output_path)?;

        let mut buf = vec![0u8; 64 * 1024];
        let mut written = 0u64;
        loop {
            let n = match decoder.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if is_format_error(&e) => {
                    return Err(decompress_err(e.to_string()).into());
                }
                Err(e) => return Err(Error::io(archive_path, e)),
            };
            staged
                .write_all(&buf[..n])
                .map_err(|e| Error::io(staged.path(), e))?;
            written += n as u64;
        }

        staged
            .persist(output_path)
            .map_err(|e| Error::io(output_path, e.error))?;

        Ok(written)
    }

    /// Decompress every `.gz` file in `dir` and remove the originals
    ///
    /// Returns the paths of the decompressed files.
    pub fn decompress_all(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut outputs = Vec::new();

        for (archive_path, stem) in detect_by_suffix(dir, GZIP_SUFFIX)? {
            let output_path = dir.join(&stem);
            info!(archive = ?archive_path, output = ?output_path, "decompressing");

            let bytes = Self::decompress(&archive_path, &output_path)?;
            remove_archive(&archive_path)?;

            debug!(output = ?output_path, bytes, "decompressed");
            outputs.push(output_path);
        }

        Ok(outputs)
    }
}
