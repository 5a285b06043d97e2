//! arx - Artifact Version Resolver CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use arx_cli::cmd;
use arx_cli::cmd::export::ExportRequest;
use arx_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let quiet = cli.quiet;

    match cli.command {
        Commands::Resolve {
            manifest,
            repository,
            strategy,
            os,
            properties,
        } => cmd::resolve::resolve(
            &manifest,
            &repository,
            strategy.into(),
            &os,
            properties.as_deref(),
            quiet,
        ),
        Commands::Export {
            descriptor,
            plugins,
            resources,
            out,
            os,
            classes,
            archive_manifest,
            archive_entries,
            extra_resources,
        } => cmd::export::export(
            &ExportRequest {
                descriptor,
                plugins,
                resources,
                out,
                os,
                classes,
                archive_manifest,
                archive_entries,
                extra_resources,
            },
            quiet,
        ),
        Commands::Verify {
            manifest,
            project_version,
            locations,
        } => cmd::verify::verify(&manifest, project_version.as_deref(), &locations, quiet),
        Commands::Stamp {
            source,
            source_pattern,
            destinations,
        } => cmd::stamp::stamp(&source, &source_pattern, &destinations, quiet),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
