//! Stagenv - per-stage environment variables kept in YAML files.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stagenv::cli::output;
use stagenv::cli::{execute, Cli};
use stagenv::error::{CipherError, ConfigError, Error, StoreError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("STAGENV_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("stagenv=debug")
        } else {
            EnvFilter::new("stagenv=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) => {
                Some("create stagenv.toml with a [stagenv] section listing your YAML files")
            }
            Error::Config(ConfigError::NoEnvFiles) => Some("add files = [\"env.yml\"] to stagenv.toml"),
            Error::Config(ConfigError::MissingKeyId { .. }) => {
                Some("set key_id in stagenv.toml for this stage")
            }
            Error::Store(StoreError::Parse { .. } | StoreError::NotMapping(_)) => {
                Some("fix the YAML file; it was left unchanged")
            }
            Error::Cipher(CipherError::NotCompiled(_)) => {
                Some("rebuild with: cargo install stagenv --features aws")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
