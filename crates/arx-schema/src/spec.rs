//! Artifact coordinates and the dependency specifications built from them.

use std::borrow::Borrow;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::version::ANY_VERSION;

/// A reverse-DNS group identifier (e.g. `com.example.platform`).
///
/// Case is preserved: repository directory names derived from a group are
/// case-significant on the filesystems we target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Create a new group id.
    pub fn new(group: impl Into<String>) -> Self {
        Self(group.into())
    }

    /// Return the group id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative directory form of the group id: dots become path separators,
    /// so `com.example` maps to `com/example`.
    pub fn as_path(&self) -> PathBuf {
        self.0.split('.').collect()
    }

    /// Whether this group carries no segments at all.
    ///
    /// Flat repositories (plugin directories) have no group axis; their
    /// specs use the empty group.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for GroupId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GroupId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An artifact identifier (e.g. `core-lib`).
///
/// Matched literally against file names, case and all; no normalization is
/// applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Create a new artifact id.
    pub fn new(artifact: impl Into<String>) -> Self {
        Self(artifact.into())
    }

    /// Return the artifact id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for ArtifactId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ArtifactId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArtifactId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single dependency declaration: which artifact, and which of its
/// versions are acceptable.
///
/// Identity is the (group, artifact) pair. Two declarations naming the same
/// artifact must resolve to the same file within one run, so the constraint
/// string takes no part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySpec {
    group: GroupId,
    artifact: ArtifactId,
    constraint: String,
}

impl DependencySpec {
    /// Create a spec with an explicit version constraint.
    pub fn new(group: GroupId, artifact: ArtifactId, constraint: impl Into<String>) -> Self {
        Self {
            group,
            artifact,
            constraint: constraint.into(),
        }
    }

    /// Create a spec that admits every version of the artifact.
    pub fn any_version(group: GroupId, artifact: ArtifactId) -> Self {
        Self::new(group, artifact, ANY_VERSION)
    }

    /// Create an any-version spec for a flat repository, where tokens carry
    /// no group axis.
    pub fn ungrouped(artifact: ArtifactId) -> Self {
        Self::any_version(GroupId::new(""), artifact)
    }

    /// The group id.
    pub fn group(&self) -> &GroupId {
        &self.group
    }

    /// The artifact id.
    pub fn artifact(&self) -> &ArtifactId {
        &self.artifact
    }

    /// The raw version constraint, exactly as declared.
    pub fn constraint(&self) -> &str {
        &self.constraint
    }
}

impl PartialEq for DependencySpec {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.artifact == other.artifact
    }
}

impl Eq for DependencySpec {}

impl std::hash::Hash for DependencySpec {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.group.hash(state);
        self.artifact.hash(state);
    }
}

impl std::fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}@{}", self.artifact, self.constraint)
        } else {
            write!(f, "{}:{}@{}", self.group, self.artifact, self.constraint)
        }
    }
}
