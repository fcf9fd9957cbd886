//! Command-line interface.

pub mod list;
pub mod materialize;
pub mod output;
pub mod run;
pub mod set;

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::cipher::Gateway;
use crate::core::config::{Config, Overrides};
use crate::core::constants;
use crate::core::lifecycle::{Action, Lifecycle, Outcome};
use crate::error::{Error, Result};

/// Stagenv - per-stage environment variables kept in YAML files.
#[derive(Parser)]
#[command(
    name = "stagenv",
    about = "Per-stage environment variables kept in YAML files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file
    #[arg(short, long, global = true, env = constants::CONFIG_ENV, default_value = constants::CONFIG_FILE)]
    pub config: PathBuf,

    /// Stage to operate on (overrides the config file)
    #[arg(short, long, global = true)]
    pub stage: Option<String>,

    /// KMS region (overrides the config file)
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Named credential profile (overrides the config file)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// List variables for the active stage
    List {
        /// Only show this attribute
        #[arg(short, long)]
        attribute: Option<String>,
        /// Decrypt encrypted values
        #[arg(short, long)]
        decrypt: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a variable for the active stage in the first YAML file
    Set {
        /// Attribute name (e.g., DATABASE_URL)
        #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
        attribute: Option<String>,
        /// Value to store
        #[arg(short = 'v', long)]
        value: String,
        /// Store the value KMS-encrypted
        #[arg(short, long)]
        encrypt: bool,
    },

    /// Write decrypted variables to the .env file
    ///
    /// With a command after `--`, the file exists only while the command runs.
    /// Interrupts (Ctrl-C, SIGQUIT, SIGHUP) go to the command and the file is
    /// still removed; SIGKILL cannot be intercepted and leaves it behind.
    Materialize {
        /// Keep the file after the command finishes
        #[arg(long)]
        keep: bool,
        /// Command to run while the file exists
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Remove the .env file
    Cleanup,

    /// Run a command with variables merged into its environment
    Run {
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
}

impl Command {
    /// Lifecycle action this command drives.
    pub fn action(&self) -> Action {
        match self {
            Command::List {
                attribute, decrypt, ..
            } => Action::List {
                attribute: attribute.clone(),
                decrypt: *decrypt,
            },
            Command::Set {
                attribute,
                value,
                encrypt,
            } => Action::Set {
                attribute: attribute.clone(),
                value: value.clone(),
                encrypt: *encrypt,
            },
            Command::Materialize { .. } => Action::Materialize,
            Command::Cleanup => Action::Cleanup,
            Command::Run { .. } => Action::Integrate,
        }
    }
}

/// Execute a command.
///
/// Every command goes through [`Lifecycle::dispatch`]; the command modules
/// only render the outcome.
pub fn execute(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        stage: cli.stage,
        region: cli.region,
        profile: cli.profile,
    };
    let config = Config::load(&cli.config)?.resolve(&overrides);
    let lifecycle = Lifecycle::new(config, Gateway::default());

    let action = cli.command.action();
    let name = action.name();
    let outcome = lifecycle.dispatch(action)?;

    match (cli.command, outcome) {
        (Command::List { json, .. }, Outcome::Listed(listings)) => {
            list::execute(&lifecycle, &listings, json)
        }
        (Command::Set { encrypt, .. }, Outcome::Set { attribute }) => {
            set::execute(&lifecycle, &attribute, encrypt)
        }
        (Command::Materialize { keep, command }, Outcome::Materialized(guard)) => {
            materialize::execute(guard, keep, &command)
        }
        (Command::Cleanup, Outcome::CleanedUp { removed }) => {
            materialize::cleanup(&lifecycle, removed)
        }
        (Command::Run { command }, Outcome::Integrated(integration)) => {
            run::execute(integration, &command)
        }
        (_, outcome) => Err(Error::Other(format!(
            "unexpected outcome for {}: {:?}",
            name, outcome
        ))),
    }
}
