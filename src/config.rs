use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PantryConfig {
    /// Remote recipe API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Markup formatter settings
    #[serde(default)]
    pub formatter: FormatterConfig,
}

/// Where and how to reach the recipe API
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub timeout: Option<u64>,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FormatterConfig {
    /// Escape HTML-significant characters in recipe text
    #[serde(default)]
    pub escape_html: bool,
}

fn default_base_url() -> String {
    "https://recipe-generator-tau.vercel.app".to_string()
}

fn default_user_agent() -> String {
    concat!("recipe-pantry/", env!("CARGO_PKG_VERSION")).to_string()
}

impl PantryConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY__ prefix
    /// 2. pantry.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY__API__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config("pantry")
    }
}

/// Load configuration from `<file_stem>.toml` (optional) and `PANTRY__*`
/// environment variables.
pub fn load_config(file_stem: &str) -> Result<PantryConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name(file_stem).required(false))
        // Use double underscore for nested: PANTRY__API__BASE_URL
        .add_source(
            Environment::with_prefix("PANTRY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
