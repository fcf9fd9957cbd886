//! Environment entry types.
//!
//! An [`EnvEntry`] is one attribute of one stage as stored in a YAML file.
//! An [`EnvFile`] groups the entries resolved from a single file.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::constants::ENCRYPT_PREFIX;

/// A single environment variable resolved from a YAML document.
///
/// `encrypted` records whether the stored form carried the `encrypted:`
/// marker. It stays `true` after [`EnvEntry::reveal`] replaces the
/// ciphertext with plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvEntry {
    pub attribute: String,
    pub value: String,
    pub encrypted: bool,
}

impl EnvEntry {
    /// Plain, unencrypted entry.
    pub fn plain(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
            encrypted: false,
        }
    }

    /// Entry whose value is ciphertext (marker already stripped).
    pub fn sealed(attribute: impl Into<String>, ciphertext: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: ciphertext.into(),
            encrypted: true,
        }
    }

    /// Build an entry from its stored form, detecting the encryption marker.
    pub fn parse(attribute: &str, stored: &str) -> Self {
        match stored.strip_prefix(ENCRYPT_PREFIX) {
            Some(ciphertext) => Self::sealed(attribute, ciphertext),
            None => Self::plain(attribute, stored),
        }
    }

    /// Replace the ciphertext with its plaintext, keeping the provenance flag.
    pub fn reveal(&mut self, plaintext: String) {
        self.value = plaintext;
    }

    /// The form written back to YAML.
    pub fn stored(&self) -> String {
        if self.encrypted {
            format!("{}{}", ENCRYPT_PREFIX, self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Entries resolved from one YAML file, in document key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvFile {
    /// Base name of the file
    pub file: String,
    /// Path as configured
    pub file_path: PathBuf,
    pub vars: Vec<EnvEntry>,
}

impl EnvFile {
    pub fn new(file_path: impl AsRef<Path>, vars: Vec<EnvEntry>) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let file = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());
        Self {
            file,
            file_path,
            vars,
        }
    }

    /// Keep only entries named `attribute`.
    pub fn retain_attribute(&mut self, attribute: &str) {
        self.vars.retain(|entry| entry.attribute == attribute);
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
