use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of saved pages per domain, counting earlier runs
    #[serde(rename = "max-pages-per-domain")]
    pub max_pages_per_domain: usize,

    /// Fixed delay after every processed URL (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Timeout for page and robots.txt requests (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for sitemap requests (seconds)
    #[serde(rename = "sitemap-timeout-secs", default = "default_sitemap_timeout")]
    pub sitemap_timeout_secs: u64,

    /// How URLs saved by earlier runs are treated
    #[serde(rename = "duplicate-mode", default)]
    pub duplicate_mode: DuplicateMode,
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    15
}

fn default_sitemap_timeout() -> u64 {
    20
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sitemap_timeout(&self) -> Duration {
        Duration::from_secs(self.sitemap_timeout_secs)
    }
}

/// Policy for URLs already present in the ledger with status 200
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateMode {
    /// Refetch and re-save everything; known URLs do not count toward the budget twice
    Overwrite,
    /// Never request or save a URL that is already in the ledger
    Skip,
    /// Delete saved pages and the ledger before the run
    #[default]
    Reset,
}

impl DuplicateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for DuplicateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            "reset" => Ok(Self::Reset),
            other => Err(format!(
                "unknown duplicate mode '{}' (expected overwrite, skip or reset)",
                other
            )),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// Contact address or URL for site operators
    pub contact: String,
}

impl UserAgentConfig {
    /// Formats the identifying string sent with every request
    ///
    /// Format: `CrawlerName/Version (+contact)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives one text file per saved page
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Path to the CSV crawl ledger
    #[serde(rename = "ledger-path")]
    pub ledger_path: PathBuf,
}

/// A domain to crawl, identified by its base URL
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    #[serde(rename = "base-url")]
    pub base_url: String,
}
