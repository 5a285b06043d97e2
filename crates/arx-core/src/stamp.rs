//! Version verification and stamping across project files.
//!
//! Projects declare their version in several places (manifests, About
//! dialogs, installer scripts). `verify` checks that every declared
//! version agrees with the project version; `stamp` copies the version
//! found in a master file into every destination that carries an obsolete
//! one.
//!
//! Patterns are matched against whole lines. A verification pattern has
//! one or two capture groups: group 1 is the displayed version, and group
//! 2, when present, narrows the comparison to a fragment of it. Stamping
//! patterns have exactly one group around the version text.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::reporter::Reporter;

/// Verification / stamping failures.
#[derive(Debug, Error)]
pub enum StampError {
    /// A file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A plan file is not valid TOML.
    #[error("failed to parse plan file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A version pattern did not compile.
    #[error("bad version pattern `{pattern}`: {source}")]
    BadPattern {
        /// The pattern as configured.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: Box<regex::Error>,
    },

    /// A version pattern has the wrong number of capture groups.
    #[error("pattern `{pattern}` must have {expected} capture group(s), found {found}")]
    GroupCount {
        /// The pattern as configured.
        pattern: String,
        /// How many groups this use requires.
        expected: &'static str,
        /// How many the pattern actually has.
        found: usize,
    },

    /// A configured file does not exist.
    #[error("cannot access {}", .0.display())]
    MissingFile(PathBuf),

    /// No line of the file matched its version pattern.
    #[error("could not find the version in {}", .0.display())]
    VersionNotFound(PathBuf),

    /// A declared version disagrees with the project version.
    #[error("version verification failure: {} has `{found}`, expected `{expected}`", .file.display())]
    Mismatch {
        /// The file carrying the wrong version.
        file: PathBuf,
        /// The version the file declares.
        found: String,
        /// The fragment of the project version it was tested against.
        expected: String,
    },
}

/// One file to check for a version declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyLocation {
    /// File to scan line by line.
    pub file: PathBuf,
    /// Line pattern with one or two capture groups.
    pub pattern: String,
    /// Whether a mismatch (or missing file) aborts the run; off by
    /// default, which downgrades both to warnings.
    #[serde(default)]
    pub fatal: bool,
}

/// A `[[locations]]` plan file driving a verification run.
#[derive(Debug, Deserialize)]
pub struct VerifyPlan {
    /// Files to check.
    #[serde(default)]
    pub locations: Vec<VerifyLocation>,
}

impl VerifyPlan {
    /// Load and parse a plan file.
    pub fn load(path: &Path) -> Result<Self, StampError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// One file to rewrite with the master version.
#[derive(Debug, Clone, Deserialize)]
pub struct StampDestination {
    /// File whose version lines get rewritten.
    pub file: PathBuf,
    /// Line pattern with exactly one capture group around the version.
    pub pattern: String,
}

/// A `[[destinations]]` plan file driving a stamping run.
#[derive(Debug, Deserialize)]
pub struct StampPlan {
    /// Files to rewrite.
    #[serde(default)]
    pub destinations: Vec<StampDestination>,
}

impl StampPlan {
    /// Load and parse a plan file.
    pub fn load(path: &Path) -> Result<Self, StampError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Check that every location's declared version agrees with
/// `project_version`.
///
/// Each file is scanned for the first line its pattern matches in full.
/// The project version truncated to the tested fragment's length must
/// equal the fragment, so a file declaring `2.4` passes against project
/// version `2.4.0`. A mismatch or missing file honors the location's
/// `fatal` flag; a file with no matching line at all is always fatal.
pub fn verify_versions(
    project_version: &str,
    plan: &VerifyPlan,
    reporter: &dyn Reporter,
) -> Result<(), StampError> {
    for location in &plan.locations {
        verify_one(project_version, location, reporter)?;
    }
    Ok(())
}

fn verify_one(
    project_version: &str,
    location: &VerifyLocation,
    reporter: &dyn Reporter,
) -> Result<(), StampError> {
    let regex = compile_line_pattern(&location.pattern, 1..=2, "one or two")?;

    if !location.file.is_file() {
        if location.fatal {
            return Err(StampError::MissingFile(location.file.clone()));
        }
        reporter.warning(&format!("cannot find file {}", location.file.display()));
        return Ok(());
    }

    let content = fs::read_to_string(&location.file)?;
    for (index, line) in content.lines().enumerate() {
        let Some(captures) = regex.captures(line) else {
            continue;
        };
        let displayed = captures.get(1).map_or("", |m| m.as_str());
        let tested = captures.get(2).map_or(displayed, |m| m.as_str());
        let expected = project_version.get(..tested.len()).unwrap_or(project_version);

        if tested == expected {
            reporter.info(&format!(
                "found compliant version {displayed} in {} line {}",
                location.file.display(),
                index + 1,
            ));
            return Ok(());
        }

        let mismatch = StampError::Mismatch {
            file: location.file.clone(),
            found: displayed.to_string(),
            expected: expected.to_string(),
        };
        if location.fatal {
            return Err(mismatch);
        }
        reporter.warning(&mismatch.to_string());
        return Ok(());
    }

    Err(StampError::VersionNotFound(location.file.clone()))
}

/// Copy the version carried by the master file into every destination.
///
/// The master's first full-matching line supplies the version. In each
/// destination every full-matching line has its captured span replaced
/// with that version, unless some matching line already carries it, in
/// which case the file is left untouched. Before a rewrite the previous
/// content is saved to `<file>.bak`.
pub fn stamp_versions(
    source: &Path,
    source_pattern: &str,
    plan: &StampPlan,
    reporter: &dyn Reporter,
) -> Result<(), StampError> {
    let version = extract_version(source, source_pattern)?;
    reporter.info(&format!("master version is {version}"));
    for destination in &plan.destinations {
        stamp_one(&version, destination, reporter)?;
    }
    Ok(())
}

fn extract_version(source: &Path, pattern: &str) -> Result<String, StampError> {
    let regex = compile_line_pattern(pattern, 1..=1, "exactly one")?;
    if !source.is_file() {
        return Err(StampError::MissingFile(source.to_path_buf()));
    }
    let content = fs::read_to_string(source)?;
    for line in content.lines() {
        if let Some(version) = regex.captures(line).and_then(|c| c.get(1)) {
            return Ok(version.as_str().to_string());
        }
    }
    Err(StampError::VersionNotFound(source.to_path_buf()))
}

fn stamp_one(
    version: &str,
    destination: &StampDestination,
    reporter: &dyn Reporter,
) -> Result<(), StampError> {
    let regex = compile_line_pattern(&destination.pattern, 1..=1, "exactly one")?;
    if !destination.file.is_file() {
        return Err(StampError::MissingFile(destination.file.clone()));
    }

    let content = fs::read_to_string(&destination.file)?;
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    let mut replacements: Vec<(usize, String)> = Vec::new();
    let mut already_correct = false;
    for (index, line) in lines.iter().enumerate() {
        let Some(span) = regex.captures(line).and_then(|c| c.get(1)) else {
            continue;
        };
        if span.as_str() == version {
            already_correct = true;
            break;
        }
        debug!(
            file = %destination.file.display(),
            obsolete = span.as_str(),
            "patching"
        );
        let mut replaced = String::with_capacity(line.len() + version.len());
        replaced.push_str(&line[..span.start()]);
        replaced.push_str(version);
        replaced.push_str(&line[span.end()..]);
        replacements.push((index, replaced));
    }

    if already_correct {
        reporter.info(&format!(
            "{} already carries {version}",
            destination.file.display()
        ));
        return Ok(());
    }
    if replacements.is_empty() {
        return Err(StampError::VersionNotFound(destination.file.clone()));
    }

    for (index, line) in replacements {
        lines[index] = line;
    }

    let mut backup = destination.file.clone().into_os_string();
    backup.push(".bak");
    let backup = PathBuf::from(backup);
    if backup.exists() {
        fs::remove_file(&backup)?;
    }
    fs::rename(&destination.file, &backup)?;

    let mut updated = lines.join("\n");
    updated.push('\n');
    fs::write(&destination.file, updated)?;

    reporter.success(&format!(
        "{} was updated to version {version}",
        destination.file.display()
    ));
    Ok(())
}

/// Compile a pattern for whole-line matching and check its group count.
fn compile_line_pattern(
    pattern: &str,
    allowed: RangeInclusive<usize>,
    expected: &'static str,
) -> Result<Regex, StampError> {
    let anchored = format!("^(?:{pattern})$");
    let regex = Regex::new(&anchored).map_err(|source| StampError::BadPattern {
        pattern: pattern.to_string(),
        source: Box::new(source),
    })?;
    let groups = regex.captures_len() - 1;
    if !allowed.contains(&groups) {
        return Err(StampError::GroupCount {
            pattern: pattern.to_string(),
            expected,
            found: groups,
        });
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    fn location(file: PathBuf, pattern: &str, fatal: bool) -> VerifyLocation {
        VerifyLocation {
            file,
            pattern: pattern.to_string(),
            fatal,
        }
    }

    #[test]
    fn test_verify_accepts_full_version_match() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("about.txt");
        write(&file, "heading\nRelease 2.4.0 (stable)\n");

        let plan = VerifyPlan {
            locations: vec![location(file, r"Release (\d+\.\d+\.\d+) .*", true)],
        };
        verify_versions("2.4.0", &plan, &NullReporter).unwrap();
    }

    #[test]
    fn test_verify_two_group_pattern_tests_the_fragment() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("plugin.xml");
        // Displayed version has a build suffix; only the 2.4 fragment is
        // compared against the project version.
        write(&file, "<plugin version=\"2.4.b17\"/>\n");

        let plan = VerifyPlan {
            locations: vec![location(
                file,
                r#"<plugin version="((\d+\.\d+)\.b\d+)"/>"#,
                true,
            )],
        };
        verify_versions("2.4.0", &plan, &NullReporter).unwrap();
    }

    #[test]
    fn test_verify_mismatch_is_fatal_when_flagged() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("about.txt");
        write(&file, "Release 2.3.9\n");

        let plan = VerifyPlan {
            locations: vec![location(file, r"Release (\d+\.\d+\.\d+)", true)],
        };
        let err = verify_versions("2.4.0", &plan, &NullReporter).unwrap_err();
        assert!(matches!(err, StampError::Mismatch { .. }));
    }

    #[test]
    fn test_verify_mismatch_warns_when_not_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("about.txt");
        write(&file, "Release 2.3.9\n");

        let plan = VerifyPlan {
            locations: vec![location(file, r"Release (\d+\.\d+\.\d+)", false)],
        };
        verify_versions("2.4.0", &plan, &NullReporter).unwrap();
    }

    #[test]
    fn test_verify_no_matching_line_is_always_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("about.txt");
        write(&file, "no version here\n");

        let plan = VerifyPlan {
            locations: vec![location(file, r"Release (\d+\.\d+\.\d+)", false)],
        };
        let err = verify_versions("2.4.0", &plan, &NullReporter).unwrap_err();
        assert!(matches!(err, StampError::VersionNotFound(_)));
    }

    #[test]
    fn test_verify_requires_full_line_match() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("about.txt");
        write(&file, "prefix Release 2.4.0\n");

        // The pattern covers only part of the line, so it never matches.
        let plan = VerifyPlan {
            locations: vec![location(file, r"Release (\d+\.\d+\.\d+)", false)],
        };
        let err = verify_versions("2.4.0", &plan, &NullReporter).unwrap_err();
        assert!(matches!(err, StampError::VersionNotFound(_)));
    }

    #[test]
    fn test_verify_rejects_patterns_with_too_many_groups() {
        let plan = VerifyPlan {
            locations: vec![location(
                PathBuf::from("whatever"),
                r"(a)(b)(c)",
                false,
            )],
        };
        let err = verify_versions("2.4.0", &plan, &NullReporter).unwrap_err();
        assert!(matches!(
            err,
            StampError::GroupCount { found: 3, .. }
        ));
    }

    #[test]
    fn test_stamp_rewrites_destination_and_keeps_backup() {
        let temp = tempfile::tempdir().unwrap();
        let master = temp.path().join("arx.toml");
        write(&master, "name = \"frontend\"\nversion = \"2.4.0\"\n");
        let target = temp.path().join("installer.nsi");
        write(&target, "Caption \"Setup\"\n!define VERSION \"2.3.9\"\n");

        let plan = StampPlan {
            destinations: vec![StampDestination {
                file: target.clone(),
                pattern: r#"!define VERSION "(.*)""#.to_string(),
            }],
        };
        stamp_versions(&master, r#"version = "(.*)""#, &plan, &NullReporter).unwrap();

        let updated = fs::read_to_string(&target).unwrap();
        assert!(updated.contains("!define VERSION \"2.4.0\""));

        let backup = fs::read_to_string(temp.path().join("installer.nsi.bak")).unwrap();
        assert!(backup.contains("!define VERSION \"2.3.9\""));
    }

    #[test]
    fn test_stamp_patches_every_obsolete_line() {
        let temp = tempfile::tempdir().unwrap();
        let master = temp.path().join("master.txt");
        write(&master, "v=9.9.9\n");
        let target = temp.path().join("doc.txt");
        write(&target, "v=1.0.0\nunrelated\nv=2.0.0\n");

        let plan = StampPlan {
            destinations: vec![StampDestination {
                file: target.clone(),
                pattern: r"v=(.*)".to_string(),
            }],
        };
        stamp_versions(&master, r"v=(.*)", &plan, &NullReporter).unwrap();

        let updated = fs::read_to_string(&target).unwrap();
        assert_eq!(updated, "v=9.9.9\nunrelated\nv=9.9.9\n");
    }

    #[test]
    fn test_stamp_leaves_correct_destination_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let master = temp.path().join("master.txt");
        write(&master, "v=2.4.0\n");
        let target = temp.path().join("doc.txt");
        write(&target, "v=2.4.0\n");

        let plan = StampPlan {
            destinations: vec![StampDestination {
                file: target.clone(),
                pattern: r"v=(.*)".to_string(),
            }],
        };
        stamp_versions(&master, r"v=(.*)", &plan, &NullReporter).unwrap();

        // No rewrite, so no backup either.
        assert!(!temp.path().join("doc.txt.bak").exists());
    }

    #[test]
    fn test_stamp_missing_pattern_in_destination_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let master = temp.path().join("master.txt");
        write(&master, "v=2.4.0\n");
        let target = temp.path().join("doc.txt");
        write(&target, "nothing matching\n");

        let plan = StampPlan {
            destinations: vec![StampDestination {
                file: target,
                pattern: r"v=(.*)".to_string(),
            }],
        };
        let err = stamp_versions(&master, r"v=(.*)", &plan, &NullReporter).unwrap_err();
        assert!(matches!(err, StampError::VersionNotFound(_)));
    }

    #[test]
    fn test_stamp_source_pattern_must_have_one_group() {
        let temp = tempfile::tempdir().unwrap();
        let master = temp.path().join("master.txt");
        write(&master, "v=2.4.0\n");

        let plan = StampPlan {
            destinations: vec![],
        };
        let err = stamp_versions(&master, r"v=.*", &plan, &NullReporter).unwrap_err();
        assert!(matches!(err, StampError::GroupCount { found: 0, .. }));
    }
}
