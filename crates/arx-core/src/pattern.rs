//! Filename patterns that recognize artifact candidates.
//!
//! A repository file belongs to an artifact when its name has the shape
//! `<artifact>-<version><suffix>.<ext>`, where the version carries exactly
//! as many dotted integer groups as the dependency's constraint and the
//! suffix is an arbitrary qualifier (classifier, build id) that plays no
//! part in selection.

use arx_schema::{ArtifactId, Version};
use regex::Regex;

/// Compiled matcher for one artifact's file names.
#[derive(Debug, Clone)]
pub struct NamingPattern {
    regex: Regex,
    arity: usize,
}

impl NamingPattern {
    /// Build the pattern for `artifact` with `arity` version segments.
    ///
    /// The artifact id is escaped and matched literally, so ids containing
    /// regex metacharacters are safe.
    pub fn build(artifact: &ArtifactId, arity: usize, extension: &str) -> Self {
        let mut version_part = String::from(r"\d+");
        for _ in 1..arity {
            version_part.push_str(r"\.\d+");
        }
        let source = format!(
            r"^{artifact}-({version_part})(.*)\.{extension}$",
            artifact = regex::escape(artifact.as_str()),
            extension = regex::escape(extension),
        );
        // Built from escaped literals around a fixed numeric body; cannot fail.
        let regex = Regex::new(&source).unwrap();
        Self { regex, arity }
    }

    /// Number of version segments the pattern expects.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Test a file name; on match, parse the embedded version.
    ///
    /// Names that do not fit the shape, including version groups past the
    /// integer range, are reported as non-matches and skipped by the
    /// scanner.
    pub fn match_file(&self, file_name: &str) -> Option<Version> {
        let captures = self.regex.captures(file_name)?;
        let version_text = captures.get(1)?.as_str();
        Version::parse(version_text).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(artifact: &str, arity: usize) -> NamingPattern {
        NamingPattern::build(&ArtifactId::new(artifact), arity, "jar")
    }

    #[test]
    fn test_matches_plain_versioned_name() {
        let p = pattern("core-lib", 2);
        let version = p.match_file("core-lib-1.4.jar").unwrap();
        assert_eq!(version.segments(), &[1, 4]);
    }

    #[test]
    fn test_matches_name_with_qualifier_suffix() {
        let p = pattern("core-lib", 3);
        let version = p.match_file("core-lib-2.0.13-SNAPSHOT.jar").unwrap();
        assert_eq!(version.segments(), &[2, 0, 13]);
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let p = pattern("core-lib", 2);
        assert!(p.match_file("core-lib-1.jar").is_none());
    }

    #[test]
    fn test_rejects_other_artifacts_and_extensions() {
        let p = pattern("core-lib", 2);
        assert!(p.match_file("other-lib-1.4.jar").is_none());
        assert!(p.match_file("core-lib-1.4.zip").is_none());
        assert!(p.match_file("core-lib-1.4.jar.sha1").is_none());
    }

    #[test]
    fn test_artifact_prefix_does_not_false_match() {
        // "core" must not claim core-lib's files: the dash must be followed
        // by the version digits.
        let p = pattern("core", 2);
        assert!(p.match_file("core-lib-1.4.jar").is_none());
        assert!(p.match_file("core-1.4.jar").is_some());
    }

    #[test]
    fn test_metacharacters_in_artifact_are_literal() {
        let p = pattern("lib+extras", 1);
        assert!(p.match_file("lib+extras-3.jar").is_some());
        assert!(p.match_file("libXextras-3.jar").is_none());
    }

    #[test]
    fn test_overlong_version_group_is_skipped() {
        let p = pattern("core-lib", 1);
        assert!(p.match_file("core-lib-99999999999.jar").is_none());
    }
}
