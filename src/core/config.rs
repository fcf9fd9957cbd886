//! Configuration file management.
//!
//! Reads `stagenv.toml` and turns it, together with command-line overrides,
//! into the immutable [`ResolverConfig`] every operation works from.
//!
//! ```toml
//! [stagenv]
//! files = ["env.yml", "secrets.yml"]
//! stage = "dev"
//! region = "eu-central-1"
//! profile = "myproject-dev"
//! key_id = { dev = "alias/dev", prod = "alias/prod" }
//!
//! [environment]
//! LOG_LEVEL = "info"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Contents of `stagenv.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stagenv: Settings,
    /// Provider environment. Wins over YAML values on collision.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    root: PathBuf,
}

/// The `[stagenv]` section.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// YAML files, in precedence order (later wins when merging)
    #[serde(default)]
    pub files: Vec<PathBuf>,
    pub stage: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    /// Materialized env file (default `.env`)
    pub dotenv: Option<PathBuf>,
    /// Local override env file
    pub local: Option<PathBuf>,
    pub key_id: Option<KeyIdSetting>,
}

/// Key id for all stages, or one per stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyIdSetting {
    Single(String),
    PerStage(BTreeMap<String, String>),
}

impl KeyIdSetting {
    /// Key id for `stage`. A per-stage table without that stage yields `None`.
    pub fn for_stage(&self, stage: &str) -> Option<String> {
        match self {
            Self::Single(key) => Some(key.clone()),
            Self::PerStage(keys) => keys.get(stage).cloned(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub stage: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Everything one invocation needs, built once.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub yaml_paths: Vec<PathBuf>,
    pub stage: String,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub key_id: Option<String>,
    pub dotenv_path: PathBuf,
    pub local_override: Option<PathBuf>,
    pub environment: BTreeMap<String, String>,
}

impl ResolverConfig {
    /// Minimal config: no key, no override file, `.env` in the working directory.
    pub fn new(stage: impl Into<String>, yaml_paths: Vec<PathBuf>) -> Self {
        Self {
            yaml_paths,
            stage: stage.into(),
            region: None,
            profile: None,
            key_id: None,
            dotenv_path: PathBuf::from(constants::ENV_FILE),
            local_override: None,
            environment: BTreeMap::new(),
        }
    }

    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let config = Self::parse(&contents, root)?;

        debug!(
            files = config.stagenv.files.len(),
            environment = config.environment.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Parse TOML text, resolving relative paths against `root`.
    pub fn parse(contents: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let mut config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.root = root.into();
        Ok(config)
    }

    /// Build the resolver config for this invocation.
    pub fn resolve(&self, overrides: &Overrides) -> ResolverConfig {
        let settings = &self.stagenv;
        let stage = overrides
            .stage
            .clone()
            .or_else(|| settings.stage.clone())
            .unwrap_or_else(|| constants::DEFAULT_STAGE.to_string());
        let key_id = settings
            .key_id
            .as_ref()
            .and_then(|setting| setting.for_stage(&stage));
        if key_id.is_none() && settings.key_id.is_some() {
            debug!(stage = %stage, "no key id for stage");
        }

        ResolverConfig {
            yaml_paths: settings.files.iter().map(|f| self.root.join(f)).collect(),
            region: overrides.region.clone().or_else(|| settings.region.clone()),
            profile: overrides.profile.clone().or_else(|| settings.profile.clone()),
            key_id,
            dotenv_path: self.root.join(
                settings
                    .dotenv
                    .as_deref()
                    .unwrap_or_else(|| Path::new(constants::ENV_FILE)),
            ),
            local_override: settings.local.as_ref().map(|l| self.root.join(l)),
            environment: self.environment.clone(),
            stage,
        }
    }
}
