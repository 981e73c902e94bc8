//! Sequential HTTP fetching of manifest entries
//!
//! Files already present in the dataset directory are never requested again.
//! Bodies are streamed into a temporary file next to the destination and
//! renamed into place only after the last chunk arrives, so a file under its
//! final name is always a complete download.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::manifest::{Dataset, FileKind};
use crate::staging::{remove_stale, stage_for};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Outcome of fetching one dataset
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Files downloaded by this run, in manifest order
    pub downloaded: Vec<PathBuf>,
    /// Files skipped because they were already present
    pub skipped: Vec<PathBuf>,
}

/// Downloads manifest entries one at a time
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher using the timeouts from `config`
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        Ok(Self { client })
    }

    /// Fetch every missing entry of `dataset` into `download_dir`
    ///
    /// The first failure aborts the run; entries after it are not attempted.
    pub async fn fetch(&self, dataset: &Dataset, download_dir: &Path) -> Result<FetchSummary> {
        tokio::fs::create_dir_all(download_dir)
            .await
            .map_err(|e| Error::io(download_dir, e))?;

        let stale = remove_stale(download_dir, &dataset.files)?;
        if !stale.is_empty() {
            debug!(count = stale.len(), "swept staging files from an interrupted run");
        }

        let mut summary = FetchSummary::default();

        for filename in &dataset.files {
            let full_path = download_dir.join(filename);

            if is_regular_file(&full_path).await {
                info!(path = ?full_path, "already exists, skipping download");
                summary.skipped.push(full_path);
                continue;
            }

            let url = dataset.download_url(filename)?;
            info!(
                url = %url,
                path = ?full_path,
                kind = ?FileKind::classify(filename),
                "downloading"
            );

            let bytes = self.fetch_file(&url, &full_path).await?;
            debug!(path = ?full_path, bytes, "download complete");
            summary.downloaded.push(full_path);
        }

        Ok(summary)
    }

    /// Download a single URL to `dest`, returning the number of bytes written
    ///
    /// The parent directory of `dest` must already exist.
    pub async fn fetch_file(&self, url: &Url, dest: &Path) -> Result<u64> {
        let network_err = |source| Error::Network {
            url: url.to_string(),
            source,
        };

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network_err)?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let part = stage_for(dest)?;
        let write_err = |e| Error::io(part.path(), e);
        let mut out = tokio::fs::File::from_std(part.reopen().map_err(write_err)?);

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(network_err)? {
            out.write_all(&chunk).await.map_err(write_err)?;
            written += chunk.len() as u64;
        }
        out.flush().await.map_err(write_err)?;
        drop(out);

        part.persist(dest).map_err(|e| Error::io(dest, e.error))?;

        Ok(written)
    }
}

async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
