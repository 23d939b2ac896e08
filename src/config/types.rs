use serde::Deserialize;
use std::path::PathBuf;

/// Output root used when neither the CLI, the environment nor the config file names one
pub const DEFAULT_OUTPUT_ROOT: &str = "/restaurants/";

/// Main configuration structure for Good Spots
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// The review site being harvested
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin that sitemap paths are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tabelog.com/".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("good-spots/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory every generated file lives under
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
        }
    }
}

impl Config {
    /// Returns a copy of this configuration writing under `root` instead
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output.root = root.into();
        self
    }

    /// Returns a copy of this configuration harvesting from `base_url` instead
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.site.base_url = base_url.into();
        self
    }
}
