//! Dataset manifests: which files to fetch and where they live

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Name of the built-in Cassandra POMDP collection
pub const CASSANDRA_NAME: &str = "cassandra";

/// Base URL of the Cassandra POMDP collection
pub const CASSANDRA_BASE_URL: &str = "http://www.pomdp.org/examples/";

/// Files of the Cassandra POMDP collection, in fetch order
pub const CASSANDRA_FILES: &[&str] = &[
    "1d.noisy.POMDP",
    "1d.POMDP",
    "4x3.95.POMDP",
    "4x4.95.POMDP",
    "4x5x2.95.POMDP.gz",
    "aloha.10.POMDP.gz",
    "aloha.30.POMDP.gz",
    "baseball.POMDP.gz",
    "bridge-repair.POMDP.gz",
    "bulkhead.A.POMDP.gz",
    "cheese.95.POMDP",
    "cheng-examples.tar.gz",
    "cit.POMDP.gz",
    "concert.POMDP",
    "ejs.tar.gz",
    "fourth.POMDP.gz",
    "hallway.POMDP.gz",
    "hallway2.POMDP.gz",
    "iff.POMDP.gz",
    "learning.c2.POMDP.gz",
    "learning.c3.POMDP.gz",
    "learning.c4.POMDP.gz",
    "line4-2goals.POMDP",
    "machine.POMDP.gz",
    "marking.POMDP",
    "marking2.POMDP",
    "mcc-example1.POMDP",
    "mcc-example2.POMDP",
    "milos-aaai97.POMDP.gz",
    "mini-hall2.POMDP",
    "mit.POMDP.gz",
    "network.POMDP",
    "paint.95.POMDP",
    "parr95.95.POMDP",
    "pentagon.POMDP.gz",
    "query.s2.POMDP.gz",
    "query.s3.POMDP.gz",
    "query.s4.POMDP.gz",
    "saci-s100-a10-z31.POMDP.gz",
    "saci-s12-a6-z5.95.POMDP.gz",
    "shuttle.95.POMDP",
    "stand-tiger.95.POMDP",
    "sunysb.POMDP.gz",
    "tiger-grid.POMDP.gz",
    "tiger.95.POMDP",
    "tiger.aaai.POMDP",
    "toy-pomdp-probs.tar.gz",
    "web-ad.POMDP",
    "web-mall.POMDP",
];

/// How a fetched file is handled by the extraction passes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Left as-is after download
    Plain,
    /// Decompressed by the gzip pass
    Gzip,
    /// Decompressed by the gzip pass, then unpacked by the tar pass
    TarGz,
    /// Unpacked by the tar pass
    Tar,
}

impl FileKind {
    /// Classify a filename by its suffix (ASCII case-insensitive)
    pub fn classify(name: &str) -> Self {
        if ends_with_ignore_case(name, ".tar.gz") {
            FileKind::TarGz
        } else if ends_with_ignore_case(name, ".gz") {
            FileKind::Gzip
        } else if ends_with_ignore_case(name, ".tar") {
            FileKind::Tar
        } else {
            FileKind::Plain
        }
    }
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.as_bytes()[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// A named collection of files served from one base URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    /// Dataset name, also the name of its subdirectory under the download root
    pub name: String,
    /// URL prefix; each filename is appended verbatim to form its download URL
    pub base_url: String,
    /// Filenames to fetch, in order
    pub files: Vec<String>,
}

impl Dataset {
    /// Build a custom dataset manifest
    pub fn new<I, S>(name: impl Into<String>, base_url: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// The Cassandra POMDP collection from pomdp.org
    pub fn cassandra() -> Self {
        Self::new(
            CASSANDRA_NAME,
            CASSANDRA_BASE_URL,
            CASSANDRA_FILES.iter().copied(),
        )
    }

    /// Directory this dataset is stored in under `root`
    pub fn directory(&self, root: &Path) -> PathBuf {
        root.join(&self.name)
    }

    /// Download URL for one manifest entry
    pub fn download_url(&self, filename: &str) -> Result<Url> {
        let url = format!("{}{}", self.base_url, filename);
        Url::parse(&url).map_err(|source| Error::InvalidUrl { url, source })
    }

    /// Reject names that would escape the download directory and unusable URLs
    pub fn validate(&self) -> Result<()> {
        if !is_plain_component(&self.name) {
            return Err(Error::Config {
                message: format!("invalid dataset name '{}'", self.name),
                key: Some("name".to_string()),
            });
        }

        Url::parse(&self.base_url).map_err(|source| Error::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })?;

        if let Some(bad) = self.files.iter().find(|f| !is_plain_component(f)) {
            return Err(Error::Config {
                message: format!(
                    "manifest entry '{}' in dataset '{}' is not a plain filename",
                    bad, self.name
                ),
                key: Some("files".to_string()),
            });
        }

        Ok(())
    }
}

fn is_plain_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
