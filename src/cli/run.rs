//! Run command.
//!
//! Executes a command with the integrated environment: YAML variables,
//! the local override file and the provider environment, in that order.

use std::collections::BTreeMap;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::writer::Integration;
use crate::error::{Error, Result};

/// Run a command with the integrated environment, exiting with its code.
pub fn execute(integration: Integration, command: &[String]) -> Result<()> {
    for attribute in &integration.collisions {
        output::warn(&format!(
            "variable '{}' is already defined in the provider environment",
            attribute
        ));
    }

    let exit_code = spawn(command, integration.environment)?;
    std::process::exit(exit_code);
}

/// Run `command` with `vars` added to the inherited environment.
///
/// While the child runs, terminal interrupts are left to the child so this
/// process survives to clean up after it. Returns the child's exit code, or
/// 1 if it was killed by a signal.
pub(crate) fn spawn(command: &[String], vars: BTreeMap<String, String>) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::Other("no command specified".to_string()))?;
    debug!(program = %program, vars = vars.len(), "spawning command");

    let mut cmd = std::process::Command::new(program);
    cmd.args(args);

    // Values are wiped from memory once handed to the child
    for (key, value) in vars {
        let value = Zeroizing::new(value);
        cmd.env(key, value.as_str());
    }

    #[cfg(unix)]
    let _interrupts = interrupts::Deferred::install(&mut cmd)?;

    let status = cmd
        .status()
        .map_err(|e| Error::Other(format!("failed to run '{}': {}", program, e)))?;
    Ok(status.code().unwrap_or(1))
}

#[cfg(unix)]
mod interrupts {
    use nix::sys::signal::{signal, SigHandler, Signal};
    use std::os::unix::process::CommandExt;
    use tracing::warn;

    use crate::error::{Error, Result};

    /// Signals a terminal sends to the whole foreground process group.
    const SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGQUIT, Signal::SIGHUP];

    /// Ignores group signals in this process until dropped.
    ///
    /// The child gets the default handlers back before `exec`, so it still
    /// reacts to Ctrl-C while this process waits and then cleans up.
    pub(super) struct Deferred {
        previous: Vec<(Signal, SigHandler)>,
    }

    impl Deferred {
        pub(super) fn install(cmd: &mut std::process::Command) -> Result<Self> {
            // SAFETY: only async-signal-safe calls between fork and exec
            unsafe {
                cmd.pre_exec(|| {
                    for sig in SIGNALS {
                        signal(sig, SigHandler::SigDfl).map_err(std::io::Error::from)?;
                    }
                    Ok(())
                });
            }

            let mut previous = Vec::with_capacity(SIGNALS.len());
            for sig in SIGNALS {
                // SAFETY: SigIgn installs no handler code
                let old = unsafe { signal(sig, SigHandler::SigIgn) }
                    .map_err(|e| Error::Other(format!("failed to ignore {}: {}", sig, e)))?;
                previous.push((sig, old));
            }
            Ok(Self { previous })
        }
    }

    impl Drop for Deferred {
        fn drop(&mut self) {
            for (sig, handler) in self.previous.drain(..) {
                // SAFETY: restores the handler that was installed before
                if let Err(e) = unsafe { signal(sig, handler) } {
                    warn!(signal = %sig, error = %e, "failed to restore signal handler");
                }
            }
        }
    }
}
