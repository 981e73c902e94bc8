//! Fetch-then-extract orchestration for one dataset

use crate::config::Config;
use crate::error::Result;
use crate::extraction::extract_all_blocking;
use crate::fetcher::Fetcher;
use crate::manifest::Dataset;
use std::path::PathBuf;
use tracing::info;

/// What a dataset preparation run did
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetReport {
    /// Directory holding the prepared dataset
    pub directory: PathBuf,
    /// Number of files downloaded
    pub downloaded: usize,
    /// Number of manifest entries already present
    pub skipped: usize,
    /// Number of files produced by the gzip pass
    pub decompressed: usize,
    /// Number of files unpacked from tar archives
    pub unpacked: usize,
}

/// Download every missing file of `dataset` and unpack the archives in place
///
/// Files land in `config.download_root/<dataset name>`. Steps run strictly in
/// order: validation, fetching (one file at a time), the gzip pass, the tar
/// pass. The first error aborts the run.
pub async fn prepare_dataset(config: &Config, dataset: &Dataset) -> Result<DatasetReport> {
    config.validate()?;
    dataset.validate()?;

    let directory = dataset.directory(&config.download_root);
    info!(
        dataset = %dataset.name,
        directory = ?directory,
        files = dataset.files.len(),
        "preparing dataset"
    );

    let fetcher = Fetcher::new(config)?;
    let fetched = fetcher.fetch(dataset, &directory).await?;
    let extracted = extract_all_blocking(directory.clone()).await?;

    let report = DatasetReport {
        directory,
        downloaded: fetched.downloaded.len(),
        skipped: fetched.skipped.len(),
        decompressed: extracted.decompressed.len(),
        unpacked: extracted.unpacked.len(),
    };

    info!(
        dataset = %dataset.name,
        downloaded = report.downloaded,
        skipped = report.skipped,
        decompressed = report.decompressed,
        unpacked = report.unpacked,
        "dataset ready"
    );

    Ok(report)
}
