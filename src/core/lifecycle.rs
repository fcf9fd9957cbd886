//! Lifecycle adapter.
//!
//! Maps lifecycle actions onto resolver and writer calls. A driver (the CLI,
//! or any host tool) builds an [`Action`] and hands it to
//! [`Lifecycle::dispatch`]; the individual operations are also public.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::cipher::Gateway;
use crate::core::config::ResolverConfig;
use crate::core::constants::REDACTED;
use crate::core::domain::{DotEnv, EnvFile};
use crate::core::resolver;
use crate::core::writer::{self, Integration};
use crate::error::{ConfigError, Result, StoreError};

/// What the driver asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Display variables, optionally one attribute, optionally decrypted
    List {
        attribute: Option<String>,
        decrypt: bool,
    },
    /// Write one attribute of the active stage
    Set {
        attribute: Option<String>,
        value: String,
        encrypt: bool,
    },
    /// Write the `.env` file
    Materialize,
    /// Remove the `.env` file
    Cleanup,
    /// Merge variables into the provider environment
    Integrate,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Set { .. } => "set",
            Self::Materialize => "materialize",
            Self::Cleanup => "cleanup",
            Self::Integrate => "integrate",
        }
    }
}

/// What an action produced.
#[derive(Debug)]
pub enum Outcome {
    Listed(Vec<Listing>),
    Set { attribute: String },
    Materialized(DotEnvGuard),
    CleanedUp { removed: bool },
    Integrated(Integration),
}

/// Display form of one file's variables.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Listing {
    pub file: String,
    pub lines: Vec<String>,
}

impl Listing {
    /// Encrypted values are masked unless they were decrypted.
    pub fn from_file(file: &EnvFile, decrypted: bool) -> Self {
        let lines = file
            .vars
            .iter()
            .map(|entry| {
                let shown = match (entry.encrypted, decrypted) {
                    (true, true) => format!("{} (encrypted)", entry.value),
                    (true, false) => REDACTED.to_string(),
                    (false, _) => entry.value.clone(),
                };
                format!("{}: {}", entry.attribute, shown)
            })
            .collect();
        Self {
            file: file.file.clone(),
            lines,
        }
    }
}

/// Lifecycle operations over one resolved configuration.
#[derive(Debug)]
pub struct Lifecycle {
    config: ResolverConfig,
    gateway: Gateway,
}

impl Lifecycle {
    pub fn new(config: ResolverConfig, gateway: Gateway) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Run one action.
    pub fn dispatch(&self, action: Action) -> Result<Outcome> {
        debug!(action = action.name(), stage = %self.config.stage, "dispatching");
        match action {
            Action::List { attribute, decrypt } => {
                self.list(attribute.as_deref(), decrypt).map(Outcome::Listed)
            }
            Action::Set {
                attribute,
                value,
                encrypt,
            } => {
                let attribute = attribute.ok_or(ConfigError::MissingAttribute)?;
                self.set(&attribute, &value, encrypt)?;
                Ok(Outcome::Set { attribute })
            }
            Action::Materialize => self.materialize().map(Outcome::Materialized),
            Action::Cleanup => self.cleanup().map(|removed| Outcome::CleanedUp { removed }),
            Action::Integrate => self.integrate().map(Outcome::Integrated),
        }
    }

    /// Resolved variables in display form.
    pub fn list(&self, attribute: Option<&str>, decrypt: bool) -> Result<Vec<Listing>> {
        let files = resolver::get_env_vars(attribute, decrypt, &self.config, &self.gateway)?;
        Ok(files
            .iter()
            .map(|file| Listing::from_file(file, decrypt))
            .collect())
    }

    /// Set one attribute in the first configured file.
    pub fn set(&self, attribute: &str, value: &str, encrypt: bool) -> Result<()> {
        resolver::set_env_var(attribute, value, encrypt, &self.config, &self.gateway)?;
        info!(attribute, stage = %self.config.stage, "variable set");
        Ok(())
    }

    /// Write the decrypted variables to the `.env` file.
    ///
    /// The returned guard removes the file when released or dropped unless
    /// [`DotEnvGuard::keep`] is called.
    pub fn materialize(&self) -> Result<DotEnvGuard> {
        let files = resolver::get_env_vars(None, true, &self.config, &self.gateway)?;
        let env = writer::write_dotenv(&files, &self.config.dotenv_path)?;
        Ok(DotEnvGuard::new(env.path().to_path_buf(), env.len()))
    }

    /// Remove the `.env` file. Returns whether a file was removed.
    pub fn cleanup(&self) -> Result<bool> {
        remove_dotenv(&self.config.dotenv_path)
    }

    /// Decrypted variables layered under the provider environment.
    pub fn integrate(&self) -> Result<Integration> {
        let files = resolver::get_env_vars(None, true, &self.config, &self.gateway)?;
        let local = match &self.config.local_override {
            Some(path) => DotEnv::load_optional(path)?,
            None => None,
        };
        Ok(writer::integrate(
            &self.config.environment,
            &files,
            local.as_ref(),
        ))
    }
}

/// Release handle for a materialized `.env` file.
///
/// Removal happens at most once, and a file that is already gone counts as
/// removed.
#[derive(Debug)]
#[must_use = "dropping the guard removes the .env file"]
pub struct DotEnvGuard {
    path: PathBuf,
    vars: usize,
    armed: bool,
}

impl DotEnvGuard {
    fn new(path: PathBuf, vars: usize) -> Self {
        Self {
            path,
            vars,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines written.
    pub fn vars(&self) -> usize {
        self.vars
    }

    /// Leave the file in place.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    /// Remove the file now.
    pub fn release(mut self) -> Result<bool> {
        self.armed = false;
        remove_dotenv(&self.path)
    }
}

impl Drop for DotEnvGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Err(e) = remove_dotenv(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove env file");
        }
    }
}

/// Remove `path`, treating a missing file as success.
pub fn remove_dotenv(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed env file");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Write {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}
