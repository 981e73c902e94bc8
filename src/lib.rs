//! # pomdp-datasets
//!
//! Fetches POMDP problem descriptions from public archives and unpacks them
//! into a local directory.
//!
//! A run has three sequential phases:
//! - **Manifest** - a fixed list of filenames and one base URL ([`Dataset`])
//! - **Fetch** - download every file not already present ([`fetcher`])
//! - **Extract** - gunzip `*.gz`, then untar `*.tar`, in place ([`extraction`])
//!
//! Re-running is cheap: files already on disk are never downloaded again.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pomdp_datasets::{Config, Dataset, prepare_dataset};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         download_root: "data".into(),
//!         ..Default::default()
//!     };
//!
//!     let report = prepare_dataset(&config, &Dataset::cassandra()).await?;
//!     println!("{} files downloaded into {}", report.downloaded, report.directory.display());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Gzip and tar extraction
pub mod extraction;
/// HTTP fetching of manifest entries
pub mod fetcher;
/// Dataset manifests
pub mod manifest;
/// Fetch-then-extract orchestration
pub mod pipeline;

mod staging;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, ExtractError, Result};
pub use extraction::{ExtractSummary, GzipExtractor, TarExtractor, extract_all};
pub use fetcher::{FetchSummary, Fetcher};
pub use manifest::{Dataset, FileKind};
pub use pipeline::{DatasetReport, prepare_dataset};
