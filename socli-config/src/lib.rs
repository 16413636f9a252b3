//! Loader for socli settings with YAML + environment overlays.
//!
//! Every field has a default, so socli runs with no file at all. Sources are
//! merged in this order, later ones winning:
//!
//! 1. YAML/TOML/JSON files or inline snippets, in the order they were added
//! 2. `SOCLI__`-prefixed environment variables (`SOCLI__SEARCH__RESULT_CAP=5`)
//!
//! String values may reference other environment variables as `${VAR}`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use socli_common::Provider;
use socli_common::observability::LogFormat;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SOCLI";

/// Largest result list the interactive picker can address with one digit.
pub const INTERACTIVE_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocliConfig {
    pub search: SearchSettings,
    pub http: HttpSettings,
    pub identity: IdentitySettings,
    pub browser: BrowserSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub provider: Provider,
    /// Results shown by the interactive front ends.
    pub result_cap: usize,
    /// Results fetched for `--index` lookups.
    pub manual_result_cap: usize,
    /// Whole-fetch attempts when the result markup is missing.
    pub extraction_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Google,
            result_cap: INTERACTIVE_RESULT_LIMIT,
            manual_result_cap: 99,
            extraction_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub network_retries: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            network_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    /// Newline-separated user agents; the built-in pool is used when unset.
    pub user_agents_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Alternate browser command; the platform opener when unset.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    #[default]
    Auto,
    Interactive,
    Line,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub mode: UiMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub emit_stderr: bool,
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            emit_stderr: false,
            filter: "info".to_string(),
        }
    }
}

/// `$XDG_CONFIG_HOME/socli/socli.yaml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("socli").join("socli.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => {
            let mut cur = std::mem::take(s);
            for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                let expanded = shellexpand::env(&cur)
                    .map(|cow| cow.into_owned())
                    .unwrap_or_else(|_| cur.clone());
                if expanded == cur {
                    break;
                }
                cur = expanded;
            }
            *s = cur;
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &SocliConfig) -> Result<(), ConfigError> {
    let search = &cfg.search;
    if search.result_cap == 0 || search.result_cap > INTERACTIVE_RESULT_LIMIT {
        return Err(ConfigError::Message(format!(
            "search.result_cap must be between 1 and {INTERACTIVE_RESULT_LIMIT}, got {}",
            search.result_cap
        )));
    }
    if search.manual_result_cap == 0 {
        return Err(ConfigError::Message(
            "search.manual_result_cap must be at least 1".into(),
        ));
    }
    if search.extraction_retries == 0 {
        return Err(ConfigError::Message(
            "search.extraction_retries must be at least 1".into(),
        ));
    }
    if cfg.http.timeout_secs == 0 {
        return Err(ConfigError::Message(
            "http.timeout_secs must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct SocliConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for SocliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SocliConfigLoader {
    /// Start with no files and `SOCLI__` environment overrides.
    ///
    /// ```
    /// use socli_common::Provider;
    /// use socli_config::SocliConfigLoader;
    ///
    /// let cfg = SocliConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(cfg.search.provider, Provider::Google);
    /// assert_eq!(cfg.search.result_cap, 10);
    /// assert_eq!(cfg.search.manual_result_cap, 99);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix. Tests use this to stay isolated
    /// from the caller's shell.
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a file that must exist; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use socli_common::Provider;
    /// use socli_config::{SocliConfigLoader, UiMode};
    ///
    /// let cfg = SocliConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// search:
    ///   provider: stackoverflow
    ///   result_cap: 5
    /// ui:
    ///   mode: line
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.search.provider, Provider::StackOverflow);
    /// assert_eq!(cfg.search.result_cap, 5);
    /// assert_eq!(cfg.search.extraction_retries, 3);
    /// assert_eq!(cfg.ui.mode, UiMode::Line);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and validate.
    pub fn load(self) -> Result<SocliConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: SocliConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;
        Ok(typed)
    }
}
