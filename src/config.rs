//! Configuration types for radio-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What to do with a page batch when some of its pages fail to fetch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFailurePolicy {
    /// Fail the whole batch on the first failed page (default)
    #[default]
    Abort,
    /// Drop failed pages, log them, and continue with the rest
    Skip,
}

/// File collision handling strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to filename
    Rename,
    /// Overwrite existing file (default)
    #[default]
    Overwrite,
    /// Skip the file, keep existing
    Skip,
}

/// Page and content fetching behavior
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum simultaneous connections for a concurrent page batch (default: 50)
    #[serde(default = "default_page_connections")]
    pub page_connections: usize,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Read/write chunk size in bytes for streamed content (default: 8192)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// How listing and detail page batches handle individual page failures
    #[serde(default)]
    pub partial_failure: PartialFailurePolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_connections: default_page_connections(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            chunk_size: default_chunk_size(),
            partial_failure: PartialFailurePolicy::default(),
        }
    }
}

/// Download behavior configuration (destination, parallelism, naming)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Destination directory for downloaded broadcasts (default: ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Number of files downloaded at the same time (default: 1)
    #[serde(default = "default_parallel_downloads")]
    pub parallel_downloads: usize,

    /// Index of the first selected broadcast in file names and display (default: 1)
    #[serde(default = "default_start_index")]
    pub start_index: usize,

    /// File collision handling
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            parallel_downloads: default_parallel_downloads(),
            start_index: default_start_index(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// Station site locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the Kol-Hay site (default: "https://www.93fm.co.il")
    #[serde(default = "default_kol_hay_base_url")]
    pub kol_hay_base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            kol_hay_base_url: default_kol_hay_base_url(),
        }
    }
}

/// Main configuration for radio-dl
///
/// `fetch` and `download` are flattened, so a JSON file reads as one flat
/// object with an optional nested `site` section:
///
/// ```json
/// { "page_connections": 20, "parallel_downloads": 3, "site": { "kol_hay_base_url": "https://www.93fm.co.il" } }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Page and content fetching behavior
    #[serde(flatten)]
    pub fetch: FetchConfig,

    /// Download behavior
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// Station site locations
    #[serde(default)]
    pub site: SiteConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields take their defaults. The result is validated before it
    /// is returned.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the fetch and download pipelines cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.download.parallel_downloads == 0 {
            return Err(Error::config(
                "parallel_downloads",
                "'parallel_downloads' must be at least 1",
            ));
        }
        if self.fetch.page_connections == 0 {
            return Err(Error::config(
                "page_connections",
                "'page_connections' must be at least 1",
            ));
        }
        if self.fetch.chunk_size == 0 {
            return Err(Error::config("chunk_size", "'chunk_size' must be at least 1"));
        }
        url::Url::parse(&self.site.kol_hay_base_url).map_err(|e| {
            Error::config("kol_hay_base_url", format!("invalid base URL: {}", e))
        })?;
        Ok(())
    }

    /// Destination directory
    pub fn output_dir(&self) -> &PathBuf {
        &self.download.output_dir
    }
}

fn default_page_connections() -> usize {
    50
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("radio-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_chunk_size() -> usize {
    8 * 1024
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_parallel_downloads() -> usize {
    1
}

fn default_start_index() -> usize {
    1
}

fn default_kol_hay_base_url() -> String {
    "https://www.93fm.co.il".to_string()
}

// Duration serialization helper
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
