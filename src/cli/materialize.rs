//! Materialize and cleanup commands.

use std::collections::BTreeMap;

use crate::cli::{output, run};
use crate::core::lifecycle::{DotEnvGuard, Lifecycle};
use crate::error::Result;

/// Report the written `.env` file and run `command` while it exists.
///
/// Without a command the file is left in place. With a command, the file is
/// removed afterwards unless `keep` is set.
pub fn execute(guard: DotEnvGuard, keep: bool, command: &[String]) -> Result<()> {
    output::success(&format!(
        "wrote {} variables to {}",
        guard.vars(),
        output::path(&guard.path().display().to_string())
    ));

    if command.is_empty() {
        guard.keep();
        return Ok(());
    }

    let spawned = run::spawn(command, BTreeMap::new());

    if keep {
        guard.keep();
    } else if guard.release()? {
        output::success("removed .env file");
    }

    let exit_code = spawned?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Report whether the `.env` file was removed.
pub fn cleanup(lifecycle: &Lifecycle, removed: bool) -> Result<()> {
    let path = lifecycle.config().dotenv_path.display().to_string();
    if removed {
        output::success(&format!("removed {}", output::path(&path)));
    } else {
        output::dimmed(&format!("nothing to remove at {}", path));
    }
    Ok(())
}
