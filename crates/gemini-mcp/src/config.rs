use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Model used when `MODEL_NAME` is not set
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Value shipped in sample `.env` files; treated as "no key"
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub model_name: String,
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    pub log_level: String,
    pub log_format: String,

    // Secrets (from ENV only)
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            gemini_base_url: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            gemini_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. built-in defaults
    /// 2. config/default.toml (if present)
    /// 3. Environment variables (MODEL_NAME, GEMINI_BASE_URL, LOG_LEVEL, LOG_FORMAT)
    ///
    /// A missing `GEMINI_API_KEY` is not an error here; it only makes the
    /// server report itself offline.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Environment::default())
    }

    /// Load from an explicit set of variables instead of the process environment
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::build(Environment::default().source(Some(map)))
    }

    fn build(environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = ConfigLoader::builder()
            .set_default("model_name", defaults.model_name)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }

    /// API key if one is actually configured
    ///
    /// Blank values and the sample placeholder count as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != API_KEY_PLACEHOLDER)
    }
}
