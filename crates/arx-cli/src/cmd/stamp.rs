//! Stamp command

use std::path::Path;

use anyhow::{Context, Result};

use arx_core::stamp::{StampPlan, stamp_versions};

use crate::console::ConsoleReporter;

/// Copy the master file's version into every destination file.
pub fn stamp(
    source: &Path,
    source_pattern: &str,
    destinations: &Path,
    quiet: bool,
) -> Result<()> {
    let output = ConsoleReporter::new(quiet);

    let plan = StampPlan::load(destinations)
        .with_context(|| format!("Failed to load destinations {}", destinations.display()))?;
    stamp_versions(source, source_pattern, &plan, &output)?;
    Ok(())
}
