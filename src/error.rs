//! Error types.
//!
//! Each subsystem has its own error enum; [`Error`] wraps them so callers can
//! match on the category (configuration, document store, cipher) while `?`
//! keeps propagation terse.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Host configuration problems. Never retried, shown verbatim.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("no environment files specified")]
    NoEnvFiles,

    #[error("no encryption key id configured for stage '{stage}'")]
    MissingKeyId { stage: String },

    #[error("setting a value requires --attribute")]
    MissingAttribute,
}

/// YAML document store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{} is not a mapping of stages", .0.display())]
    NotMapping(PathBuf),

    #[error("failed to serialize YAML: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Encrypt/decrypt capability failures. Propagated unchanged.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("failed to connect to KMS: {0}")]
    Connect(String),

    #[error("{0} KMS support not compiled")]
    NotCompiled(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
