//! Verify command

use std::path::Path;

use anyhow::{Context, Result};

use arx_core::Reporter;
use arx_core::manifest::Manifest;
use arx_core::stamp::{VerifyPlan, verify_versions};

use crate::console::ConsoleReporter;

/// Check that every configured location declares the project version.
///
/// The reference version comes from the flag when given, otherwise from
/// the manifest's `[project]` table.
pub fn verify(
    manifest_path: &Path,
    project_version: Option<&str>,
    locations: &Path,
    quiet: bool,
) -> Result<()> {
    let output = ConsoleReporter::new(quiet);

    let version = match project_version {
        Some(version) => version.to_string(),
        None => {
            Manifest::load(manifest_path)
                .with_context(|| {
                    format!("Failed to load manifest {}", manifest_path.display())
                })?
                .project
                .version
        }
    };
    let plan = VerifyPlan::load(locations)
        .with_context(|| format!("Failed to load locations {}", locations.display()))?;

    verify_versions(&version, &plan, &output)?;
    output.success(&format!("Version declarations agree with {version}"));
    Ok(())
}
