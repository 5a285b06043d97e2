//! Resolve command

use std::path::Path;

use anyhow::{Context, Result};

use arx_core::manifest::Manifest;
use arx_core::{BuildConfig, Reporter, Strategy, resolve_all};

use crate::console::ConsoleReporter;

/// Resolve the manifest's dependencies and print the resulting mapping.
pub fn resolve(
    manifest_path: &Path,
    repository: &Path,
    strategy: Strategy,
    target_os: &str,
    properties: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let output = ConsoleReporter::new(quiet);

    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    let specs = manifest.dependency_specs();
    if specs.is_empty() {
        output.info("No dependencies declared.");
        return Ok(());
    }

    // Resolved paths should come out absolute even when the repository
    // was given relative to the working directory.
    let repository =
        std::fs::canonicalize(repository).unwrap_or_else(|_| repository.to_path_buf());
    let config = BuildConfig::new(repository, target_os);

    output.section(&format!(
        "Resolving {} dependencies for {} {}",
        specs.len(),
        manifest.project.name,
        manifest.project.version
    ));
    let report = resolve_all(&config, strategy, &specs)?;

    print!("{report}");
    println!("classpath: {}", report.classpath());

    if let Some(path) = properties {
        report
            .write_properties(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        output.success(&format!(
            "Wrote resolution properties to {}",
            path.display()
        ));
    }

    Ok(())
}
