//! Dependency resolution over a filesystem repository.
//!
//! One resolution run walks the declared dependencies in order, finds the
//! best matching file for each, and aggregates them into a
//! [`ResolutionReport`]. The first fatal condition aborts the run; nothing
//! is cached between runs and no ambient configuration is consulted.

use std::io;
use std::path::PathBuf;

use arx_schema::{ConstraintError, DependencySpec, VersionInterval};
use thiserror::Error;
use tracing::debug;

use crate::DEFAULT_ARCHIVE_EXT;
use crate::pattern::NamingPattern;
use crate::report::{ResolutionEntry, ResolutionReport};
use crate::scan::{list_flat, scan_tree};
use crate::select::{Strategy, select_in_range, select_prefix_lexicographic};

/// Explicit configuration for one resolution run.
///
/// The resolver reads nothing from the ambient environment; everything it
/// needs arrives here.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Repository root directory.
    pub repository: PathBuf,
    /// Target operating system tag, used when filtering plugin lists and
    /// naming OS-specific resources.
    pub target_os: String,
    /// Archive extension candidate files must carry, without the dot.
    pub archive_ext: String,
}

impl BuildConfig {
    /// Configuration with the stock archive extension.
    pub fn new(repository: impl Into<PathBuf>, target_os: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            target_os: target_os.into(),
            archive_ext: DEFAULT_ARCHIVE_EXT.to_string(),
        }
    }
}

/// Fatal resolution failures. The first one aborts the run.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The dependency's version constraint did not parse.
    #[error("dependency {spec}: bad version constraint: {source}")]
    MalformedConstraint {
        /// The offending dependency.
        spec: String,
        /// What the constraint parser rejected.
        #[source]
        source: ConstraintError,
    },

    /// A repository directory that should exist does not.
    #[error("repository directory not found: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    /// No candidate satisfied the constraint.
    #[error("cannot resolve {spec}: nothing under {} satisfies `{constraint}`", .searched.display())]
    UnresolvedDependency {
        /// The dependency that stayed unresolved.
        spec: String,
        /// Its constraint, verbatim.
        constraint: String,
        /// Where candidates were looked for.
        searched: PathBuf,
    },

    /// The parsed interval's bounds disagree on segment count. The parser
    /// rejects such constraints up front, so hitting this means an internal
    /// invariant broke.
    #[error("constraint `{constraint}` produced an interval with mismatched bounds")]
    AmbiguousConstraint {
        /// The constraint whose interval came out inconsistent.
        constraint: String,
    },

    /// Filesystem failure while scanning.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Resolve every spec in declaration order against the configured
/// repository, or fail on the first fatal error.
pub fn resolve_all(
    config: &BuildConfig,
    strategy: Strategy,
    specs: &[DependencySpec],
) -> Result<ResolutionReport, ResolveError> {
    let mut report = ResolutionReport::new();
    for spec in specs {
        report.push(resolve_spec(config, strategy, spec)?);
    }
    Ok(report)
}

/// Resolve a single dependency with the given strategy.
pub fn resolve_spec(
    config: &BuildConfig,
    strategy: Strategy,
    spec: &DependencySpec,
) -> Result<ResolutionEntry, ResolveError> {
    debug!(spec = %spec, ?strategy, "resolving");
    match strategy {
        Strategy::RangeNumeric => resolve_range(config, spec),
        Strategy::PrefixLexicographic => resolve_flat(config, spec, false),
        Strategy::ExactFilename => resolve_flat(config, spec, true),
    }
}

/// Conventional artifact location: `<repository>/<group-as-path>/<artifact>`.
fn artifact_root(config: &BuildConfig, spec: &DependencySpec) -> PathBuf {
    config
        .repository
        .join(spec.group().as_path())
        .join(spec.artifact().as_str())
}

fn resolve_range(
    config: &BuildConfig,
    spec: &DependencySpec,
) -> Result<ResolutionEntry, ResolveError> {
    let interval =
        VersionInterval::parse(spec.constraint()).map_err(|source| {
            ResolveError::MalformedConstraint {
                spec: spec.to_string(),
                source,
            }
        })?;
    if interval.lower().arity() != interval.upper().arity() {
        return Err(ResolveError::AmbiguousConstraint {
            constraint: spec.constraint().to_string(),
        });
    }

    let root = artifact_root(config, spec);
    let pattern = NamingPattern::build(spec.artifact(), interval.arity(), &config.archive_ext);
    let candidates = scan_tree(&root, &pattern)?;
    debug!(count = candidates.len(), root = %root.display(), "scanned");

    let winner = select_in_range(&interval, candidates).ok_or_else(|| {
        ResolveError::UnresolvedDependency {
            spec: spec.to_string(),
            constraint: spec.constraint().to_string(),
            searched: root.clone(),
        }
    })?;
    debug!(spec = %spec, file = %winner.path.display(), "resolved");
    Ok(ResolutionEntry::new(spec.clone(), winner.path))
}

fn resolve_flat(
    config: &BuildConfig,
    spec: &DependencySpec,
    exact_first: bool,
) -> Result<ResolutionEntry, ResolveError> {
    let dir = &config.repository;
    let token = spec.artifact().as_str();

    if exact_first {
        let dotted_ext = format!(".{}", config.archive_ext);
        let file_name = if token.ends_with(&dotted_ext) {
            token.to_string()
        } else {
            format!("{token}{dotted_ext}")
        };
        let exact = dir.join(&file_name);
        if exact.is_file() {
            debug!(spec = %spec, file = %exact.display(), "exact hit");
            return Ok(ResolutionEntry::new(spec.clone(), exact));
        }
        debug!(spec = %spec, "no exact hit, scanning by prefix");
    }

    let files = list_flat(dir)?;
    let winner = select_prefix_lexicographic(token, &config.archive_ext, &files).ok_or_else(
        || ResolveError::UnresolvedDependency {
            spec: spec.to_string(),
            constraint: spec.constraint().to_string(),
            searched: dir.clone(),
        },
    )?;
    debug!(spec = %spec, file = %winner.display(), "resolved");
    Ok(ResolutionEntry::new(spec.clone(), winner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_schema::{ArtifactId, GroupId};
    use std::fs;
    use std::path::Path;

    fn touch(path: &Path) {
        fs::write(path, b"jar bytes").unwrap();
    }

    fn spec(group: &str, artifact: &str, constraint: &str) -> DependencySpec {
        DependencySpec::new(GroupId::new(group), ArtifactId::new(artifact), constraint)
    }

    /// Lay out `<repo>/com/example/<artifact>/` with the given file names.
    fn repo_with(artifact: &str, files: &[&str]) -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("com").join("example").join(artifact);
        fs::create_dir_all(&dir).unwrap();
        for name in files {
            touch(&dir.join(name));
        }
        temp
    }

    #[test]
    fn test_range_resolution_picks_highest_in_range() {
        let repo = repo_with(
            "core-lib",
            &[
                "core-lib-0.9.jar",
                "core-lib-1.2.jar",
                "core-lib-1.9.jar",
                "core-lib-2.0.jar",
            ],
        );
        let config = BuildConfig::new(repo.path(), "linux");
        let entry = resolve_spec(
            &config,
            Strategy::RangeNumeric,
            &spec("com.example", "core-lib", "[1.0,2.0)"),
        )
        .unwrap();
        assert!(entry.file().ends_with("core-lib-1.9.jar"));
    }

    #[test]
    fn test_exact_constraint_resolves_single_version() {
        let repo = repo_with("core-lib", &["core-lib-1.2.3.jar", "core-lib-1.2.4.jar"]);
        let config = BuildConfig::new(repo.path(), "linux");
        let entry = resolve_spec(
            &config,
            Strategy::RangeNumeric,
            &spec("com.example", "core-lib", "1.2.3"),
        )
        .unwrap();
        assert!(entry.file().ends_with("core-lib-1.2.3.jar"));
    }

    #[test]
    fn test_single_matching_file_resolves_under_loose_constraint() {
        let repo = repo_with("core-lib", &["core-lib-7.jar"]);
        let config = BuildConfig::new(repo.path(), "linux");
        let entry = resolve_spec(
            &config,
            Strategy::RangeNumeric,
            &spec("com.example", "core-lib", "[0,)"),
        )
        .unwrap();
        assert!(entry.file().ends_with("core-lib-7.jar"));
    }

    #[test]
    fn test_candidates_in_nested_version_directories() {
        let temp = tempfile::tempdir().unwrap();
        let base = temp.path().join("com").join("example").join("core-lib");
        fs::create_dir_all(base.join("1.2")).unwrap();
        fs::create_dir_all(base.join("1.4")).unwrap();
        touch(&base.join("1.2").join("core-lib-1.2.jar"));
        touch(&base.join("1.4").join("core-lib-1.4.jar"));

        let config = BuildConfig::new(temp.path(), "linux");
        let entry = resolve_spec(
            &config,
            Strategy::RangeNumeric,
            &spec("com.example", "core-lib", "[1.0,2.0)"),
        )
        .unwrap();
        assert!(entry.file().ends_with("1.4/core-lib-1.4.jar"));
    }

    #[test]
    fn test_missing_artifact_directory_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let config = BuildConfig::new(temp.path(), "linux");
        let err = resolve_spec(
            &config,
            Strategy::RangeNumeric,
            &spec("com.example", "core-lib", "[1.0,2.0)"),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::RepositoryNotFound(_)));
    }

    #[test]
    fn test_out_of_range_only_is_unresolved() {
        let repo = repo_with("core-lib", &["core-lib-2.5.jar"]);
        let config = BuildConfig::new(repo.path(), "linux");
        let err = resolve_spec(
            &config,
            Strategy::RangeNumeric,
            &spec("com.example", "core-lib", "[1.0,2.0)"),
        )
        .unwrap_err();
        match err {
            ResolveError::UnresolvedDependency { spec, .. } => {
                assert!(spec.contains("core-lib"));
            }
            other => panic!("expected UnresolvedDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_constraint_names_the_dependency() {
        let repo = repo_with("core-lib", &["core-lib-1.0.jar"]);
        let config = BuildConfig::new(repo.path(), "linux");
        let err = resolve_spec(
            &config,
            Strategy::RangeNumeric,
            &spec("com.example", "core-lib", "[1.0,oops)"),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::MalformedConstraint { .. }));
    }

    #[test]
    fn test_batch_aborts_on_first_failure() {
        let repo = repo_with("core-lib", &["core-lib-1.0.jar"]);
        let config = BuildConfig::new(repo.path(), "linux");
        let specs = vec![
            spec("com.example", "missing", "[1.0,2.0)"),
            spec("com.example", "core-lib", "[1.0,2.0)"),
        ];
        let err = resolve_all(&config, Strategy::RangeNumeric, &specs).unwrap_err();
        assert!(matches!(err, ResolveError::RepositoryNotFound(_)));
    }

    #[test]
    fn test_report_preserves_declaration_order() {
        let temp = tempfile::tempdir().unwrap();
        for artifact in ["zeta", "alpha"] {
            let dir = temp.path().join("com").join("example").join(artifact);
            fs::create_dir_all(&dir).unwrap();
            touch(&dir.join(format!("{artifact}-1.0.jar")));
        }
        let config = BuildConfig::new(temp.path(), "linux");
        let specs = vec![
            spec("com.example", "zeta", "[1.0,2.0]"),
            spec("com.example", "alpha", "[1.0,2.0]"),
        ];
        let report = resolve_all(&config, Strategy::RangeNumeric, &specs).unwrap();
        let artifacts: Vec<_> = report
            .entries()
            .iter()
            .map(|e| e.spec().artifact().as_str().to_string())
            .collect();
        assert_eq!(artifacts, ["zeta", "alpha"]);
    }

    #[test]
    fn test_exact_filename_strategy_direct_hit() {
        let temp = tempfile::tempdir().unwrap();
        touch(&temp.path().join("native-io.jar"));
        touch(&temp.path().join("native-io-extra.jar"));

        let config = BuildConfig::new(temp.path(), "linux");
        let entry = resolve_spec(
            &config,
            Strategy::ExactFilename,
            &DependencySpec::ungrouped(ArtifactId::new("native-io")),
        )
        .unwrap();
        assert!(entry.file().ends_with("native-io.jar"));
    }

    #[test]
    fn test_exact_filename_strategy_falls_back_to_prefix() {
        let temp = tempfile::tempdir().unwrap();
        touch(&temp.path().join("native-io_1.2.0.jar"));

        let config = BuildConfig::new(temp.path(), "linux");
        let entry = resolve_spec(
            &config,
            Strategy::ExactFilename,
            &DependencySpec::ungrouped(ArtifactId::new("native-io")),
        )
        .unwrap();
        assert!(entry.file().ends_with("native-io_1.2.0.jar"));
    }

    #[test]
    fn test_prefix_strategy_prefers_highest_filename_string() {
        let temp = tempfile::tempdir().unwrap();
        touch(&temp.path().join("foo-9.jar"));
        touch(&temp.path().join("foo-10.jar"));

        let config = BuildConfig::new(temp.path(), "linux");
        let entry = resolve_spec(
            &config,
            Strategy::PrefixLexicographic,
            &DependencySpec::ungrouped(ArtifactId::new("foo")),
        )
        .unwrap();
        assert!(entry.file().ends_with("foo-9.jar"));
    }

    #[test]
    fn test_flat_strategy_missing_directory_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let config = BuildConfig::new(temp.path().join("absent"), "linux");
        let err = resolve_spec(
            &config,
            Strategy::PrefixLexicographic,
            &DependencySpec::ungrouped(ArtifactId::new("foo")),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::RepositoryNotFound(_)));
    }
}
