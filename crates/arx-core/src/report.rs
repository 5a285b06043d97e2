//! The outcome of a resolution run.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arx_schema::DependencySpec;

/// Path-list separator for the current platform, the same character that
/// separates classpath entries.
pub const PATH_LIST_SEP: char = if cfg!(windows) { ';' } else { ':' };

/// Separator between an artifact id and its resolved path in the
/// resolutions string.
pub const RESOLUTION_SEP: char = '=';

/// One resolved dependency.
#[derive(Debug, Clone)]
pub struct ResolutionEntry {
    spec: DependencySpec,
    file: PathBuf,
}

impl ResolutionEntry {
    /// Pair a spec with the file that won for it.
    pub fn new(spec: DependencySpec, file: PathBuf) -> Self {
        Self { spec, file }
    }

    /// The dependency this entry resolves.
    pub fn spec(&self) -> &DependencySpec {
        &self.spec
    }

    /// The winning file.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Ordered mapping from dependency spec to the file that won.
///
/// Entries appear in declaration order, and the derived classpath and
/// resolutions strings preserve it.
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    entries: Vec<ResolutionEntry>,
}

impl ResolutionReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next resolved dependency.
    pub fn push(&mut self, entry: ResolutionEntry) {
        self.entries.push(entry);
    }

    /// The resolved entries, in declaration order.
    pub fn entries(&self) -> &[ResolutionEntry] {
        &self.entries
    }

    /// Number of resolved dependencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The resolved files, in declaration order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(ResolutionEntry::file)
    }

    /// Resolved paths joined by the platform path-list separator, in
    /// declaration order. This is the string downstream compile steps
    /// consume.
    pub fn classpath(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if !out.is_empty() {
                out.push(PATH_LIST_SEP);
            }
            out.push_str(&entry.file.to_string_lossy());
        }
        out
    }

    /// `artifact=path` pairs joined by the platform path-list separator,
    /// mirroring the classpath order.
    pub fn resolutions(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if !out.is_empty() {
                out.push(PATH_LIST_SEP);
            }
            out.push_str(entry.spec.artifact().as_str());
            out.push(RESOLUTION_SEP);
            out.push_str(&entry.file.to_string_lossy());
        }
        out
    }

    /// Write the derived strings as `key=value` lines.
    ///
    /// Written via a temporary file and rename so a crash never leaves a
    /// half-written properties file behind.
    pub fn write_properties(&self, path: &Path) -> io::Result<()> {
        let content = format!(
            "repository.resolutions={}\njava.compile.classpath={}\n",
            self.resolutions(),
            self.classpath(),
        );
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl fmt::Display for ResolutionReport {
    /// Aligned `dependency -> file` rows, one per entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|entry| entry.spec.artifact().len())
            .max()
            .unwrap_or(0);
        for entry in &self.entries {
            writeln!(
                f,
                "{:<width$} -> {}",
                entry.spec.artifact().as_str(),
                entry.file.display(),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_schema::{ArtifactId, GroupId};

    fn entry(artifact: &str, file: &str) -> ResolutionEntry {
        ResolutionEntry::new(
            DependencySpec::new(GroupId::new("com.example"), ArtifactId::new(artifact), "1.0"),
            PathBuf::from(file),
        )
    }

    #[test]
    fn test_classpath_preserves_declaration_order() {
        let mut report = ResolutionReport::new();
        report.push(entry("zeta", "/repo/zeta-1.0.jar"));
        report.push(entry("alpha", "/repo/alpha-1.0.jar"));

        let classpath = report.classpath();
        let expected = format!("/repo/zeta-1.0.jar{PATH_LIST_SEP}/repo/alpha-1.0.jar");
        assert_eq!(classpath, expected);
    }

    #[test]
    fn test_resolutions_pairs_artifact_with_path() {
        let mut report = ResolutionReport::new();
        report.push(entry("core-lib", "/repo/core-lib-1.0.jar"));

        assert_eq!(report.resolutions(), "core-lib=/repo/core-lib-1.0.jar");
    }

    #[test]
    fn test_display_aligns_on_longest_artifact() {
        let mut report = ResolutionReport::new();
        report.push(entry("core-lib", "/repo/core-lib-1.0.jar"));
        report.push(entry("io", "/repo/io-1.0.jar"));

        let rendered = report.to_string();
        assert!(rendered.contains("core-lib -> /repo/core-lib-1.0.jar"));
        assert!(rendered.contains("io       -> /repo/io-1.0.jar"));
    }

    #[test]
    fn test_write_properties_emits_both_keys() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("build.properties");

        let mut report = ResolutionReport::new();
        report.push(entry("core-lib", "/repo/core-lib-1.0.jar"));
        report.write_properties(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("repository.resolutions=core-lib=/repo/core-lib-1.0.jar"));
        assert!(content.contains("java.compile.classpath=/repo/core-lib-1.0.jar"));
    }

    #[test]
    fn test_empty_report_has_empty_strings() {
        let report = ResolutionReport::new();
        assert!(report.is_empty());
        assert_eq!(report.classpath(), "");
        assert_eq!(report.resolutions(), "");
        assert_eq!(report.to_string(), "");
    }
}
