//! YAML document store.
//!
//! A document maps stage names to flat mappings of attribute → value. Key
//! order is preserved on read and write. Nothing below the attribute level
//! is interpreted.

use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result, StoreError};

/// A parsed stage document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Mapping,
}

impl Document {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML text.
    ///
    /// Empty, null, non-mapping, or malformed input is not an error: a
    /// warning is logged and an empty document is returned.
    pub fn parse(contents: &str, origin: &Path) -> Self {
        match serde_yaml::from_str::<Value>(contents) {
            Ok(Value::Mapping(root)) => Self { root },
            Ok(_) => {
                warn!(path = %origin.display(), "YAML file seems to be empty or invalid");
                Self::new()
            }
            Err(e) => {
                warn!(path = %origin.display(), error = %e, "YAML file seems to be empty or invalid");
                Self::new()
            }
        }
    }

    /// Parse YAML text for a read-modify-write cycle.
    ///
    /// Only empty or null input counts as an empty document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` for malformed YAML and
    /// `StoreError::NotMapping` when the root is not a mapping.
    pub fn parse_strict(contents: &str, origin: &Path) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::new());
        }
        match serde_yaml::from_str::<Value>(contents) {
            Ok(Value::Mapping(root)) => Ok(Self { root }),
            Ok(Value::Null) => Ok(Self::new()),
            Ok(_) => Err(StoreError::NotMapping(origin.to_path_buf()).into()),
            Err(source) => Err(StoreError::Parse {
                path: origin.to_path_buf(),
                source,
            }
            .into()),
        }
    }

    /// Read a document from disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the file does not exist and
    /// `StoreError::Read` for any other I/O failure.
    pub fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "reading YAML document");
        let contents = read_contents(path)?;
        Ok(Self::parse(&contents, path))
    }

    /// Read a document for modification, treating a missing file as empty.
    ///
    /// Unlike [`Document::read`], malformed content is an error here.
    pub fn read_or_default(path: &Path) -> Result<Self> {
        match read_contents(path) {
            Ok(contents) => Self::parse_strict(&contents, path),
            Err(Error::Store(StoreError::NotFound(_))) => {
                debug!(path = %path.display(), "YAML file missing, starting empty");
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Serialize and overwrite `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), stages = self.root.len(), "writing YAML document");

        let contents = serde_yaml::to_string(&self.root).map_err(StoreError::Serialize)?;
        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, contents).map_err(write_err)?;

        Ok(())
    }

    /// Stage names in document order.
    pub fn stages(&self) -> Vec<String> {
        self.root.keys().filter_map(scalar_text).collect()
    }

    /// Attribute/value pairs of `stage`, in document order.
    ///
    /// An absent stage yields no pairs.
    pub fn stage_entries(&self, stage: &str) -> Vec<(String, String)> {
        let Some(Value::Mapping(attributes)) = self.root.get(stage) else {
            return Vec::new();
        };

        attributes
            .iter()
            .filter_map(|(key, value)| {
                let attribute = scalar_text(key)?;
                match scalar_text(value) {
                    Some(text) => Some((attribute, text)),
                    None => {
                        trace!(stage, attribute = %attribute, "skipping non-scalar value");
                        None
                    }
                }
            })
            .collect()
    }

    /// Stored value of `stage.attribute`.
    pub fn get(&self, stage: &str, attribute: &str) -> Option<String> {
        match self.root.get(stage) {
            Some(Value::Mapping(attributes)) => attributes.get(attribute).and_then(scalar_text),
            _ => None,
        }
    }

    /// Set `stage.attribute`, creating the stage when needed.
    ///
    /// Other stages and attributes are left untouched.
    pub fn set(&mut self, stage: &str, attribute: &str, value: &str) {
        if !matches!(self.root.get(stage), Some(Value::Mapping(_))) {
            self.root
                .insert(Value::String(stage.to_string()), Value::Mapping(Mapping::new()));
        }
        if let Some(Value::Mapping(attributes)) = self.root.get_mut(stage) {
            attributes.insert(
                Value::String(attribute.to_string()),
                Value::String(value.to_string()),
            );
        }
    }
}

fn read_contents(path: &Path) -> Result<String> {
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
    Ok(contents)
}

/// Text of a scalar node; `None` for mappings, sequences and tagged values.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
