//! Stagenv - per-stage environment variables kept in YAML files.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line driver
//! │   ├── list          # Show variables for a stage
//! │   ├── set           # Write one attribute
//! │   ├── materialize   # Write (and clean up) the .env file
//! │   └── run           # Run a command with the integrated environment
//! └── core/             # Core library components
//!     ├── config        # stagenv.toml and the resolved config
//!     ├── document      # YAML document store
//!     ├── cipher/       # KMS gateway and backends
//!     ├── resolver      # Stage selection, filtering, decryption
//!     ├── writer        # .env serialization and merging
//!     └── lifecycle     # Action dispatcher
//! ```
//!
//! # Stored format
//!
//! ```yaml
//! dev:
//!   DATABASE_URL: postgres://localhost/dev
//!   API_KEY: encrypted:AQICAHh...
//! prod:
//!   DATABASE_URL: postgres://db.internal/prod
//! ```
//!
//! Values prefixed with `encrypted:` hold base64 KMS ciphertext.

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::cipher::Gateway;
pub use crate::core::config::ResolverConfig;
pub use crate::core::domain::{EnvEntry, EnvFile};
pub use crate::core::resolver::{get_env_vars, set_env_var};
