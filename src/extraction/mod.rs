//! In-place decompression of gzip files and unpacking of tar archives
//!
//! Extraction runs as two passes over the dataset directory. The gzip pass
//! finishes before the tar pass starts, so `foo.tar.gz` becomes `foo.tar`
//! and is then picked up by the tar pass. Each pass lists the directory
//! fresh.

mod gzip;
mod shared;
mod tarball;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

// Re-exports
pub use gzip::GzipExtractor;
pub use tarball::TarExtractor;

use crate::error::{ExtractError, Result};
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::info;

/// Files produced by both extraction passes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Outputs of the gzip pass (including intermediate `.tar` files)
    pub decompressed: Vec<PathBuf>,
    /// Regular files unpacked from tar archives
    pub unpacked: Vec<PathBuf>,
}

/// Run the gzip pass, then the tar pass, over `dir`
///
/// The first failure aborts; files already processed stay processed.
pub fn extract_all(dir: &Path) -> Result<ExtractSummary> {
    let decompressed = GzipExtractor::decompress_all(dir)?;
    let unpacked = TarExtractor::unpack_all(dir)?;

    info!(
        ?dir,
        decompressed = decompressed.len(),
        unpacked = unpacked.len(),
        "extraction complete"
    );

    Ok(ExtractSummary {
        decompressed,
        unpacked,
    })
}

/// [`extract_all`] on the blocking thread pool, awaited to completion
pub async fn extract_all_blocking(dir: PathBuf) -> Result<ExtractSummary> {
    spawn_blocking(move || extract_all(&dir))
        .await
        .map_err(|e| ExtractError::TaskFailed {
            reason: e.to_string(),
        })?
}
