//! arx - Artifact Version Resolver
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! Command-line front end for resolving declared dependencies against a
//! filesystem artifact repository and exporting runnable product bundles.
//!
//! # Overview
//!
//! Projects declare their dependencies in `arx.toml` with interval version
//! constraints. `arx resolve` walks the repository, picks the highest
//! admissible version of each artifact, and prints the resulting mapping
//! and classpath. `arx export` assembles a platform bundle from a product
//! descriptor, and `arx verify` / `arx stamp` keep the version
//! declarations scattered across project files in agreement.
//!
//! # Architecture
//!
//! - **Interval constraints**: version specs parse into inclusive or
//!   exclusive interval bounds; candidates compare segment-wise at equal
//!   arity.
//! - **Strategies**: `range-numeric` for versioned repository trees,
//!   `prefix-lexicographic` and `exact-filename` for flat legacy layouts.
//! - **Reporter**: console output is injected through `arx_core::Reporter`
//!   so the core library stays silent and testable.

pub mod cmd;
pub mod console;

pub use arx_core::Strategy;
pub use console::ConsoleReporter;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "arx")]
#[command(author, version, about = "arx - resolve artifact versions and export product bundles")]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve declared dependencies against the artifact repository
    Resolve {
        /// Project manifest
        #[arg(long, default_value = "arx.toml")]
        manifest: PathBuf,
        /// Artifact repository root
        #[arg(long)]
        repository: PathBuf,
        /// Candidate selection strategy
        #[arg(long, value_enum, default_value_t = StrategyArg::RangeNumeric)]
        strategy: StrategyArg,
        /// Target operating system tag
        #[arg(long, default_value = std::env::consts::OS)]
        os: String,
        /// Write resolution properties to this file
        #[arg(long)]
        properties: Option<PathBuf>,
    },
    /// Export a runnable product bundle
    Export {
        /// Product descriptor
        #[arg(long)]
        descriptor: PathBuf,
        /// Flat plugin repository
        #[arg(long)]
        plugins: PathBuf,
        /// Packaging resources root, one subdirectory per target OS
        #[arg(long)]
        resources: PathBuf,
        /// Output directory receiving the versioned bundle
        #[arg(long)]
        out: PathBuf,
        /// Target operating system tag
        #[arg(long, default_value = std::env::consts::OS)]
        os: String,
        /// Compiled classes to archive into the product plugin
        #[arg(long)]
        classes: Option<PathBuf>,
        /// Manifest file for the product archive
        #[arg(long, default_value = "META-INF/MANIFEST.MF")]
        archive_manifest: PathBuf,
        /// Extra entry included in the product archive (repeatable)
        #[arg(long = "archive-entry")]
        archive_entries: Vec<PathBuf>,
        /// Extra file or directory copied into the bundle (repeatable)
        #[arg(long = "resource")]
        extra_resources: Vec<PathBuf>,
    },
    /// Check version declarations across project files
    Verify {
        /// Project manifest supplying the reference version
        #[arg(long, default_value = "arx.toml")]
        manifest: PathBuf,
        /// Reference version, overriding the manifest
        #[arg(long)]
        project_version: Option<String>,
        /// Locations plan file
        #[arg(long)]
        locations: PathBuf,
    },
    /// Copy the master version into destination files
    Stamp {
        /// File carrying the master version
        #[arg(long)]
        source: PathBuf,
        /// Line pattern extracting the master version
        #[arg(long)]
        source_pattern: String,
        /// Destinations plan file
        #[arg(long)]
        destinations: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Candidate selection strategy, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Numeric interval matching over a versioned repository tree
    RangeNumeric,
    /// Highest file name by string order, filtered by name prefix
    PrefixLexicographic,
    /// The token names the file outright; prefix scan as fallback
    ExactFilename,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RangeNumeric => Strategy::RangeNumeric,
            StrategyArg::PrefixLexicographic => Strategy::PrefixLexicographic,
            StrategyArg::ExactFilename => Strategy::ExactFilename,
        }
    }
}
