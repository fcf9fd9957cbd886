//! Environment resolver.
//!
//! Reads the configured YAML files, selects the active stage, detects
//! encrypted values and optionally decrypts them. Also implements the single
//! attribute write path.

use std::path::Path;
use tracing::debug;

use crate::core::cipher::Gateway;
use crate::core::config::ResolverConfig;
use crate::core::constants::ENCRYPT_PREFIX;
use crate::core::document::Document;
use crate::core::domain::{EnvEntry, EnvFile};
use crate::error::{ConfigError, Result};

/// Resolve the active stage's variables from every configured file.
///
/// Files keep their configured order. With a non-empty `attribute`, each
/// file is reduced to that attribute and files without it are dropped. With `decrypt`, every
/// encrypted entry is replaced by its plaintext.
///
/// # Errors
///
/// Any missing or unreadable file, and any failed decryption, fails the whole
/// call. There are no partial results.
pub fn get_env_vars(
    attribute: Option<&str>,
    decrypt: bool,
    config: &ResolverConfig,
    gateway: &Gateway,
) -> Result<Vec<EnvFile>> {
    debug!(
        stage = %config.stage,
        files = config.yaml_paths.len(),
        attribute = ?attribute,
        decrypt,
        "resolving environment"
    );

    let mut files = config
        .yaml_paths
        .iter()
        .map(|path| read_env_file(path, &config.stage))
        .collect::<Result<Vec<_>>>()?;

    if let Some(attribute) = attribute.filter(|a| !a.is_empty()) {
        files = filter_attribute(files, attribute);
    }

    if decrypt {
        decrypt_all(&mut files, config, gateway)?;
    }

    Ok(files)
}

/// Set one attribute of the active stage in the first configured file.
///
/// A missing file is created. The stage is created when absent. Other
/// stages and attributes are untouched.
///
/// # Errors
///
/// Returns `ConfigError::NoEnvFiles` when no files are configured. Read
/// errors other than not-found, malformed or non-mapping YAML, encryption
/// failures and write failures abort before anything is written.
pub fn set_env_var(
    attribute: &str,
    value: &str,
    encrypt: bool,
    config: &ResolverConfig,
    gateway: &Gateway,
) -> Result<()> {
    let path = config.yaml_paths.first().ok_or(ConfigError::NoEnvFiles)?;
    debug!(path = %path.display(), stage = %config.stage, attribute, encrypt, "setting variable");

    let mut document = Document::read_or_default(path)?;
    let stored = if encrypt {
        format!("{}{}", ENCRYPT_PREFIX, gateway.encrypt(value, config)?)
    } else {
        value.to_string()
    };

    document.set(&config.stage, attribute, &stored);
    document.write(path)
}

/// Entries of `stage` in one file; an absent stage yields none.
fn read_env_file(path: &Path, stage: &str) -> Result<EnvFile> {
    let document = Document::read(path)?;
    let vars = document
        .stage_entries(stage)
        .iter()
        .map(|(attribute, stored)| EnvEntry::parse(attribute, stored))
        .collect();
    Ok(EnvFile::new(path, vars))
}

fn filter_attribute(files: Vec<EnvFile>, attribute: &str) -> Vec<EnvFile> {
    files
        .into_iter()
        .filter_map(|mut file| {
            file.retain_attribute(attribute);
            (!file.is_empty()).then_some(file)
        })
        .collect()
}

fn decrypt_all(files: &mut [EnvFile], config: &ResolverConfig, gateway: &Gateway) -> Result<()> {
    for entry in files
        .iter_mut()
        .flat_map(|file| file.vars.iter_mut())
        .filter(|entry| entry.encrypted)
    {
        let plaintext = gateway.decrypt(&entry.value, config)?;
        entry.reveal(plaintext);
    }
    Ok(())
}
