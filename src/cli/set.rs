//! Set command.

use crate::cli::output;
use crate::core::lifecycle::Lifecycle;
use crate::error::Result;

/// Confirm a stored value.
pub fn execute(lifecycle: &Lifecycle, attribute: &str, encrypt: bool) -> Result<()> {
    let suffix = if encrypt { " (encrypted)" } else { "" };
    output::success(&format!(
        "set {} for stage {}{}",
        output::key(attribute),
        lifecycle.config().stage,
        suffix
    ));
    Ok(())
}
