//! Configuration types for pomdp-datasets

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Main configuration for dataset preparation
///
/// Every field has a default, so `Config::default()` is a complete, working
/// configuration and partial JSON/TOML documents deserialize cleanly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for all datasets (default: "datasets")
    ///
    /// Each dataset is placed in its own subdirectory, e.g. `datasets/cassandra`.
    #[serde(default = "default_download_root")]
    pub download_root: PathBuf,

    /// Total time allowed for a single file request, body included (default: 300s)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Time allowed to establish a connection (default: 30s)
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_root: default_download_root(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Config {
    /// Check the configuration for values that can never work
    pub fn validate(&self) -> Result<()> {
        if self.download_root.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "download root must not be empty".to_string(),
                key: Some("download_root".to_string()),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request timeout must be greater than zero".to_string(),
                key: Some("request_timeout".to_string()),
            });
        }

        if self.connect_timeout.is_zero() {
            return Err(Error::Config {
                message: "connect timeout must be greater than zero".to_string(),
                key: Some("connect_timeout".to_string()),
            });
        }

        Ok(())
    }
}

fn default_download_root() -> PathBuf {
    PathBuf::from("datasets")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
