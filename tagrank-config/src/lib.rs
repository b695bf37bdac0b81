//! Loader for tagrank configuration with YAML + environment overlays.
//!
//! Sources are layered in this order, later ones winning:
//!
//! 1. the embedded defaults ([`DEFAULT_CONFIG_YAML`]), which pull the search API
//!    credentials from `CONSUMER_KEY`, `CONSUMER_SECRET`, `ACCESS_TOKEN` and
//!    `ACCESS_TOKEN_SECRET`, and the optional store endpoint from `DYNAMODB_URL`;
//! 2. an optional YAML file;
//! 3. `TAGRANK__`-prefixed environment variables (`TAGRANK__STORE__TABLE_NAME=...`).
//!
//! `${VAR}` and `${VAR:-default}` placeholders are expanded after merging.
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tagrank_common::TagrankError;
use tagrank_common::observability::LogFormat;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CONFIG_YAML: &str = r#"
twitter:
  consumer_key: "${CONSUMER_KEY:-}"
  consumer_secret: "${CONSUMER_SECRET:-}"
  access_token: "${ACCESS_TOKEN:-}"
  access_token_secret: "${ACCESS_TOKEN_SECRET:-}"
  api_base_url: "https://api.twitter.com/1.1/"
store:
  table_name: "users"
  region: "us-east-1"
  endpoint_url: "${DYNAMODB_URL:-}"
logging:
  format: "text"
  default_filter: "info"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct TagrankConfig {
    pub twitter: TwitterConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
pub struct TwitterConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterConfig")
            .field("consumer_key", &self.consumer_key)
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_table_name")]
    pub table_name: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub default_filter: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_filter: default_filter(),
            log_dir: None,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.twitter.com/1.1/".into()
}
fn default_table_name() -> String {
    "users".into()
}
fn default_region() -> String {
    "us-east-1".into()
}
fn default_filter() -> String {
    "info".into()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),
    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigLoadError> for TagrankError {
    fn from(e: ConfigLoadError) -> Self {
        match e {
            ConfigLoadError::MissingCredential(_) => TagrankError::Auth(e.to_string()),
            other => TagrankError::Config(other.to_string()),
        }
    }
}

impl TagrankConfig {
    /// Reject empty or unexpanded credentials and blank store settings.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let creds = [
            (&self.twitter.consumer_key, "CONSUMER_KEY"),
            (&self.twitter.consumer_secret, "CONSUMER_SECRET"),
            (&self.twitter.access_token, "ACCESS_TOKEN"),
            (&self.twitter.access_token_secret, "ACCESS_TOKEN_SECRET"),
        ];
        for (value, var) in creds {
            if value.trim().is_empty() || value.contains("${") {
                return Err(ConfigLoadError::MissingCredential(var));
            }
        }
        if self.store.table_name.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                field: "store.table_name",
                reason: "must not be empty".into(),
            });
        }
        if self.store.region.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                field: "store.region",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Blank optional strings (e.g. an unset `DYNAMODB_URL`) become `None`.
fn normalize(mut cfg: TagrankConfig) -> TagrankConfig {
    cfg.store.endpoint_url = cfg
        .store
        .endpoint_url
        .take()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    cfg
}

/// Builder hides the `config` crate wiring (defaults + YAML + env overrides).
pub struct TagrankConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for TagrankConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagrankConfigLoader {
    /// Start from the embedded defaults.
    ///
    /// ```
    /// use tagrank_config::TagrankConfigLoader;
    ///
    /// let cfg = TagrankConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// twitter:
    ///   consumer_key: "ck"
    ///   consumer_secret: "cs"
    ///   access_token: "at"
    ///   access_token_secret: "ats"
    /// "#)
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.store.table_name, "users");
    /// assert_eq!(cfg.store.region, "us-east-1");
    /// assert_eq!(cfg.twitter.api_base_url, "https://api.twitter.com/1.1/");
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Load a `.env` file from the working directory (or its parents) into the
    /// process environment, if one exists. Existing variables are kept.
    pub fn with_dotenv(self) -> Self {
        let _ = dotenv::dotenv();
        self
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder, expand `${VAR}` placeholders and validate the result.
    pub fn load(self) -> Result<TagrankConfig, ConfigLoadError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix("TAGRANK").separator("__"))
            .build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: TagrankConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        let typed = normalize(typed);
        typed.validate()?;
        Ok(typed)
    }
}
