//! List command.

use crate::cli::output;
use crate::core::lifecycle::{Lifecycle, Listing};
use crate::error::{Error, Result};

/// Print each file's variables for the active stage.
pub fn execute(lifecycle: &Lifecycle, listings: &[Listing], json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(listings)
            .map_err(|e| Error::Other(format!("failed to render JSON: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    if listings.iter().all(|listing| listing.lines.is_empty()) {
        output::dimmed(&format!(
            "no variables for stage {}",
            lifecycle.config().stage
        ));
        return Ok(());
    }

    for listing in listings {
        output::header(&format!("{}:", listing.file));
        for line in &listing.lines {
            println!("  {}", line);
        }
    }
    Ok(())
}
