//! Console reporter for command output.

use std::path::Path;

use arx_core::Reporter;
use arx_schema::DependencySpec;

/// Prints progress and status lines to the terminal.
///
/// Informational output honors the global quiet flag; warnings and errors
/// always reach stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Reporter honoring the given quiet flag.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        if !self.quiet {
            println!();
            println!("{title}");
        }
    }

    fn resolved(&self, spec: &DependencySpec, file: &Path) {
        if !self.quiet {
            println!("  {} -> {}", spec.artifact(), file.display());
        }
    }

    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {msg}");
        }
    }

    fn success(&self, msg: &str) {
        if !self.quiet {
            println!("✓ {msg}");
        }
    }

    fn warning(&self, msg: &str) {
        eprintln!("warning: {msg}");
    }

    fn error(&self, msg: &str) {
        eprintln!("error: {msg}");
    }
}
