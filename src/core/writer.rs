//! Environment writer.
//!
//! Turns resolved files into `.env` text, a merged map, or an integrated
//! environment layered under the provider's own variables.
//!
//! Precedence, lowest first:
//!
//! ```text
//! YAML files (last file wins) < local override file < provider environment
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::domain::{DotEnv, EnvFile};
use crate::error::Result;

/// `ATTRIBUTE=VALUE` lines in file order then entry order.
///
/// Values are not quoted or escaped, so a value holding a newline produces
/// a broken line. Consumers rely on the raw format.
pub fn to_dotenv(files: &[EnvFile]) -> String {
    DotEnv::from_files(files, "").to_string()
}

/// Write the `.env` file for `files` to `path`.
pub fn write_dotenv(files: &[EnvFile], path: &Path) -> Result<DotEnv> {
    let env = DotEnv::from_files(files, path);
    debug!(path = %path.display(), vars = env.len(), "writing env file");
    env.save()?;
    Ok(env)
}

/// Single map of all entries; a later file overwrites an earlier one.
pub fn merge(files: &[EnvFile]) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for entry in files.iter().flat_map(|file| file.vars.iter()) {
        merged.insert(entry.attribute.clone(), entry.value.clone());
    }
    merged
}

/// Result of layering YAML values under a provider environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Integration {
    pub environment: BTreeMap<String, String>,
    /// YAML attributes ignored because the provider defines them, one per occurrence
    pub collisions: Vec<String>,
}

/// Merge YAML files and an optional local override under `provider`.
///
/// An attribute already defined by the provider keeps the provider's value
/// and is reported as a collision.
pub fn integrate(
    provider: &BTreeMap<String, String>,
    files: &[EnvFile],
    local: Option<&DotEnv>,
) -> Integration {
    let mut environment = BTreeMap::new();
    let mut collisions = Vec::new();

    for file in files {
        for entry in &file.vars {
            if provider.contains_key(&entry.attribute) {
                warn!(
                    attribute = %entry.attribute,
                    file = %file.file,
                    "variable is already defined by the provider environment"
                );
                collisions.push(entry.attribute.clone());
            } else {
                environment.insert(entry.attribute.clone(), entry.value.clone());
            }
        }
    }

    if let Some(local) = local {
        for (key, value) in local.entries() {
            if provider.contains_key(key) {
                debug!(key = %key, path = %local.path().display(), "local override shadowed by provider");
                continue;
            }
            environment.insert(key.clone(), value.clone());
        }
    }

    environment.extend(provider.iter().map(|(k, v)| (k.clone(), v.clone())));

    Integration {
        environment,
        collisions,
    }
}
