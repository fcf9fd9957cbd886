//! DotEnv type.
//!
//! A `.env` file: either the materialized output of a resolution or a local
//! override file read back from disk.

use crate::core::domain::EnvFile;
use crate::error::{Result, StoreError};
#[cfg(unix)]
use std::io::Write;
use std::path::{Path, PathBuf};

/// An ordered list of `KEY=value` pairs bound to a path.
#[derive(Debug, Clone)]
pub struct DotEnv {
    entries: Vec<(String, String)>,
    path: PathBuf,
}

impl DotEnv {
    /// Parse a .env file from disk
    ///
    /// Skips empty lines and comments (lines starting with #).
    /// Supports values with or without quotes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the file is missing, or
    /// `StoreError::Read` if it cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_path_buf())
            } else {
                StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut entries = Vec::new();
        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().trim_start_matches("export ").trim().to_string();
                entries.push((key, parse_env_value(value.trim())));
            }
        }

        Ok(Self {
            entries,
            path: path.to_path_buf(),
        })
    }

    /// Like [`DotEnv::load`], but a missing file yields `None`.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match Self::load(path) {
            Ok(env) => Ok(Some(env)),
            Err(crate::error::Error::Store(StoreError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Collect entries from resolved files, in file order then entry order.
    ///
    /// Duplicate attributes across files are kept, one line each.
    pub fn from_files(files: &[EnvFile], path: impl Into<PathBuf>) -> Self {
        let entries = files
            .iter()
            .flat_map(|file| file.vars.iter())
            .map(|entry| (entry.attribute.clone(), entry.value.clone()))
            .collect();
        Self {
            entries,
            path: path.into(),
        }
    }

    /// Write the env file to disk with owner-only permissions, creating
    /// parent directories as needed.
    ///
    /// Values are written verbatim; nothing is quoted or escaped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Write` if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let content = self.to_string();
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .mode(0o600)
                .open(&self.path)
                .map_err(write_err)?;
            file.write_all(content.as_bytes()).map_err(write_err)?;
            file.flush().map_err(write_err)?;

            // Existing files keep their old mode on open
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(&self.path, content).map_err(write_err)?;
        }

        Ok(())
    }

    /// Get the last value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All entries as key-value pairs
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_env_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape_double_quoted(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// `KEY=value` lines joined by `\n`, no trailing newline.
impl std::fmt::Display for DotEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
