//! Export command

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use arx_core::assemble::{ArchiveSpec, BundleSpec, assemble_bundle, create_archive};
use arx_core::descriptor::ProductDescriptor;
use arx_core::resolve::ResolveError;
use arx_core::{BuildConfig, Reporter, Strategy, resolve_spec};

use crate::console::ConsoleReporter;

/// Inputs collected from the command line.
#[derive(Debug)]
pub struct ExportRequest {
    /// Product descriptor file.
    pub descriptor: PathBuf,
    /// Flat plugin repository.
    pub plugins: PathBuf,
    /// Packaging resources root, one subdirectory per target OS.
    pub resources: PathBuf,
    /// Output directory receiving the versioned bundle.
    pub out: PathBuf,
    /// Target operating system tag.
    pub os: String,
    /// Compiled classes to archive into the product plugin.
    pub classes: Option<PathBuf>,
    /// Manifest file for the product archive.
    pub archive_manifest: PathBuf,
    /// Extra entries included in the product archive.
    pub archive_entries: Vec<PathBuf>,
    /// Extra files or directories copied into the bundle.
    pub extra_resources: Vec<PathBuf>,
}

/// Assemble a product bundle, optionally archiving the product's own
/// classes into its plugins directory.
pub fn export(request: &ExportRequest, quiet: bool) -> Result<()> {
    let output = ConsoleReporter::new(quiet);

    let descriptor = ProductDescriptor::load(&request.descriptor).with_context(|| {
        format!("Failed to load descriptor {}", request.descriptor.display())
    })?;
    output.section(&format!(
        "Exporting {} {} for {}",
        descriptor.product.name,
        descriptor.bundle_version(),
        request.os
    ));

    // Plugin builds in the OS-specific resource directory shadow the
    // common ones in the plugin repository.
    let os_dir = request.resources.join(request.os.to_lowercase());
    let shadowed = BuildConfig::new(&os_dir, &request.os);
    let common = BuildConfig::new(&request.plugins, &request.os);

    let mut plugin_files = Vec::new();
    for spec in descriptor.plugin_specs(&request.os) {
        let entry = match resolve_spec(&shadowed, Strategy::PrefixLexicographic, &spec) {
            Ok(entry) => {
                debug!(plugin = %spec.artifact(), "found OS-specific build");
                entry
            }
            Err(
                ResolveError::UnresolvedDependency { .. } | ResolveError::RepositoryNotFound(_),
            ) => resolve_spec(&common, Strategy::PrefixLexicographic, &spec)
                .with_context(|| format!("Failed to resolve plugin {}", spec.artifact()))?,
            Err(err) => return Err(err.into()),
        };
        output.resolved(&spec, entry.file());
        plugin_files.push(entry.file().to_path_buf());
    }

    let bundle_spec = BundleSpec {
        descriptor: &descriptor,
        target_os: &request.os,
        resources: &request.resources,
        out: &request.out,
    };
    let bundle = assemble_bundle(&bundle_spec, &plugin_files, &request.extra_resources)
        .context("Failed to assemble bundle")?;
    output.success(&format!("Bundle assembled at {}", bundle.display()));

    if let Some(classes) = &request.classes {
        let archive = create_archive(&ArchiveSpec {
            name: &descriptor.product.name,
            version: &descriptor.bundle_version(),
            classes,
            manifest: &request.archive_manifest,
            entries: &request.archive_entries,
            out_dir: &bundle.join("plugins"),
        })
        .context("Failed to create product archive")?;
        output.success(&format!("Product archive at {}", archive.display()));
    }

    Ok(())
}
