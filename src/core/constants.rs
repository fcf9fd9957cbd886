//! Constants used throughout stagenv.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name (stagenv.toml).
pub const CONFIG_FILE: &str = "stagenv.toml";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_ENV: &str = "STAGENV_CONFIG";

/// Default materialized env file name (.env).
pub const ENV_FILE: &str = ".env";

/// Stage used when neither the config file nor the command line names one.
pub const DEFAULT_STAGE: &str = "dev";

/// Marker prefixed to stored values that hold KMS ciphertext.
pub const ENCRYPT_PREFIX: &str = "encrypted:";

/// Shown in listings in place of values that were not decrypted.
pub const REDACTED: &str = "******";
